//! Embedded single-page HTML frontend.
//!
//! The whole UI is one HTML constant with inline CSS and JavaScript: a
//! sidebar for the API key, spreadsheet upload/download, workflow
//! definitions and recent tasks, and a chat pane that renders replies as
//! markdown, checklists or tables.

/// The complete HTML frontend as a static string.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>TaskPilot</title>
<style>
*,*::before,*::after{box-sizing:border-box;margin:0;padding:0}
:root{
  --bg:#1a1a2e;
  --bg-secondary:#16213e;
  --bg-input:#0f3460;
  --bg-user:#533483;
  --bg-assistant:#16213e;
  --text:#e4e4e4;
  --text-muted:#8a8a9a;
  --accent:#e94560;
  --accent-hover:#ff6b81;
  --border:#2a2a4a;
  --code-bg:#0d1117;
  --success:#4ecca3;
  --warning:#f0a500;
}
html,body{height:100%;font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,Helvetica,Arial,sans-serif;background:var(--bg);color:var(--text)}
body{display:flex}

/* Sidebar */
.sidebar{
  width:300px;flex-shrink:0;overflow-y:auto;padding:16px;
  background:var(--bg-secondary);border-right:1px solid var(--border);
  display:flex;flex-direction:column;gap:18px;
}
.sidebar h2{font-size:14px;font-weight:600;margin-bottom:8px;color:var(--text-muted);text-transform:uppercase;letter-spacing:.5px}
.sidebar input,.sidebar select,.sidebar textarea{
  width:100%;padding:8px 10px;border-radius:8px;margin-bottom:6px;
  background:var(--bg-input);border:1px solid var(--border);color:var(--text);font-family:inherit;font-size:13px;
}
.sidebar button{
  padding:7px 12px;border-radius:8px;border:none;cursor:pointer;
  background:var(--accent);color:#fff;font-size:13px;margin-right:4px;
}
.sidebar button:hover{background:var(--accent-hover)}
.sidebar button.secondary{background:var(--bg-input)}
.note{font-size:12px;color:var(--text-muted);margin-top:4px}
.note.error{color:var(--accent)}
.note.ok{color:var(--success)}
.history li,.workflows li{list-style:none;font-size:13px;padding:3px 0;color:var(--text-muted)}

/* Main */
.main{flex:1;display:flex;flex-direction:column;min-width:0}
.header{
  padding:12px 20px;background:var(--bg-secondary);border-bottom:1px solid var(--border);flex-shrink:0;
}
.header h1{font-size:18px;font-weight:600;letter-spacing:.5px}
.header h1 span{color:var(--accent)}
.header p{font-size:13px;color:var(--text-muted)}

.messages{flex:1;overflow-y:auto;padding:16px 20px;display:flex;flex-direction:column;gap:12px}
.message{
  max-width:900px;width:100%;margin:0 auto;padding:14px 18px;border-radius:12px;
  line-height:1.6;font-size:15px;word-wrap:break-word;overflow-wrap:break-word;
}
.message.user{background:var(--bg-user);border-bottom-right-radius:4px}
.message.assistant{background:var(--bg-assistant);border:1px solid var(--border);border-bottom-left-radius:4px}
.message .meta{font-size:12px;color:var(--text-muted);margin-bottom:6px}
.message.pending{color:var(--text-muted);font-style:italic}

table.data{border-collapse:collapse;margin-top:8px;font-size:13px;display:block;overflow-x:auto}
table.data th,table.data td{border:1px solid var(--border);padding:4px 8px;text-align:left;white-space:nowrap}
table.data th{background:var(--bg-input)}

code{font-family:"SF Mono",Monaco,Consolas,monospace;background:var(--code-bg);padding:2px 6px;border-radius:4px;font-size:13px}
pre{background:var(--code-bg);padding:14px;border-radius:8px;overflow-x:auto;margin:8px 0;border:1px solid var(--border)}
pre code{background:none;padding:0}

.input-area{flex-shrink:0;padding:16px 20px;background:var(--bg-secondary);border-top:1px solid var(--border)}
.input-wrapper{max-width:900px;margin:0 auto;display:flex;gap:10px;align-items:flex-end}
.input-wrapper textarea{
  flex:1;resize:none;padding:12px 16px;border-radius:12px;background:var(--bg-input);
  border:1px solid var(--border);color:var(--text);font-size:15px;font-family:inherit;
  line-height:1.5;min-height:48px;max-height:200px;outline:none;
}
.input-wrapper textarea:focus{border-color:var(--accent)}
.send-btn{
  height:48px;padding:0 18px;border-radius:12px;border:none;background:var(--accent);
  color:#fff;cursor:pointer;font-size:15px;
}
.send-btn:disabled{opacity:.4;cursor:not-allowed}

@media(max-width:800px){
  body{flex-direction:column}
  .sidebar{width:100%;max-height:40vh;border-right:none;border-bottom:1px solid var(--border)}
}
</style>
</head>
<body>

<aside class="sidebar">
  <section>
    <h2>Configuration</h2>
    <input id="apiKey" type="password" placeholder="API key">
    <button id="saveKey">Save key</button>
    <div class="note" id="keyNote"></div>
  </section>

  <section>
    <h2>Spreadsheet</h2>
    <input id="fileInput" type="file" accept=".csv,.xlsx,.xls">
    <button class="secondary" id="clearFile">Clear</button>
    <button class="secondary" id="dlCsv">CSV</button>
    <button class="secondary" id="dlXlsx">XLSX</button>
    <div class="note" id="fileNote"></div>
    <div id="preview"></div>
  </section>

  <section>
    <h2>Workflows</h2>
    <input id="wfName" placeholder="Workflow name">
    <select id="wfTrigger">
      <option value="manual">Manual</option>
      <option value="daily">Daily</option>
      <option value="weekly">Weekly</option>
      <option value="monthly">Monthly</option>
      <option value="on_file_upload">On file upload</option>
    </select>
    <select id="wfCategory">
      <option value="hr">HR</option>
      <option value="sales">Sales</option>
      <option value="finance">Finance</option>
      <option value="reporting">Reporting</option>
      <option value="sheets">Sheets</option>
    </select>
    <textarea id="wfSteps" rows="4" placeholder="One step per line"></textarea>
    <button id="wfSave">Save workflow</button>
    <div class="note" id="wfNote"></div>
    <ul class="workflows" id="wfList"></ul>
  </section>

  <section>
    <h2>Recent Tasks</h2>
    <ul class="history" id="history"><li>No tasks yet</li></ul>
  </section>
</aside>

<div class="main">
  <div class="header">
    <h1><span>Task</span>Pilot</h1>
    <p>Automate HR &bull; Sales &bull; Finance &bull; Reporting &bull; Sheets</p>
  </div>

  <div class="messages" id="messages"></div>

  <div class="input-area">
    <div class="input-wrapper">
      <textarea id="input" placeholder="Describe a task..." rows="1"></textarea>
      <button class="send-btn" id="sendBtn">Send</button>
    </div>
  </div>
</div>

<script>
(function() {
  "use strict";

  const $ = function(id) { return document.getElementById(id); };
  const messagesEl = $("messages");
  const inputEl = $("input");
  const sendBtn = $("sendBtn");

  let sessionId = null;
  let isProcessing = false;

  // -------------------------------------------------------------------
  // API helpers
  // -------------------------------------------------------------------

  function api(path, opts) {
    return fetch("/api/sessions/" + sessionId + path, opts).then(function(resp) {
      const type = resp.headers.get("content-type") || "";
      const body = type.indexOf("application/json") >= 0 ? resp.json() : Promise.resolve(null);
      return body.then(function(json) {
        if (!resp.ok) throw new Error((json && json.error) || resp.statusText);
        return json;
      });
    });
  }

  function jsonOpts(method, body) {
    return {method: method, headers: {"content-type": "application/json"}, body: JSON.stringify(body)};
  }

  function note(id, text, cls) {
    const el = $(id);
    el.textContent = text;
    el.className = "note " + (cls || "");
  }

  // -------------------------------------------------------------------
  // Rendering
  // -------------------------------------------------------------------

  function addMessage(role, html) {
    const el = document.createElement("div");
    el.className = "message " + role;
    el.innerHTML = html;
    messagesEl.appendChild(el);
    scrollToBottom();
    return el;
  }

  function renderTable(table) {
    if (!table || !table.columns) return "";
    let html = '<table class="data"><thead><tr>';
    table.columns.forEach(function(c) { html += "<th>" + escapeHtml(c) + "</th>"; });
    html += "</tr></thead><tbody>";
    table.rows.forEach(function(row) {
      html += "<tr>";
      row.forEach(function(cell) {
        html += "<td>" + escapeHtml(cell === null ? "" : String(cell)) + "</td>";
      });
      html += "</tr>";
    });
    return html + "</tbody></table>";
  }

  function renderMarkdown(text) {
    let html = escapeHtml(text);
    html = html.replace(/```(\w*)\n([\s\S]*?)```/g, function(_, lang, code) {
      return '<pre><code>' + code + '</code></pre>';
    });
    html = html.replace(/`([^`]+)`/g, '<code>$1</code>');
    html = html.replace(/\*\*(.+?)\*\*/g, '<strong>$1</strong>');
    html = html.replace(/^#{1,6} (.+)$/gm, '<strong>$1</strong>');
    html = html.replace(/\n/g, '<br>');
    return html;
  }

  function escapeHtml(str) {
    const div = document.createElement("div");
    div.appendChild(document.createTextNode(str));
    return div.innerHTML;
  }

  function scrollToBottom() {
    requestAnimationFrame(function() { messagesEl.scrollTop = messagesEl.scrollHeight; });
  }

  // -------------------------------------------------------------------
  // Chat
  // -------------------------------------------------------------------

  function sendMessage() {
    const text = inputEl.value.trim();
    if (!text || isProcessing) return;

    addMessage("user", escapeHtml(text));
    inputEl.value = "";
    isProcessing = true;
    sendBtn.disabled = true;
    const pending = addMessage("assistant pending", "Processing...");

    api("/chat", jsonOpts("POST", {message: text}))
      .then(function(r) {
        pending.className = "message assistant";
        pending.innerHTML =
          '<div class="meta">Task: ' + escapeHtml(r.task) + " &middot; " + escapeHtml(r.description) + "</div>" +
          renderMarkdown(r.reply) + renderTable(r.table);
        refreshHistory();
      })
      .catch(function(e) {
        pending.className = "message assistant";
        pending.textContent = e.message;
      })
      .finally(function() {
        isProcessing = false;
        sendBtn.disabled = false;
        scrollToBottom();
      });
  }

  // -------------------------------------------------------------------
  // Sidebar
  // -------------------------------------------------------------------

  function saveKey() {
    api("/credentials", jsonOpts("PUT", {api_key: $("apiKey").value}))
      .then(function(r) { note("keyNote", r.configured ? "Key saved for this session" : "Key cleared", "ok"); })
      .catch(function(e) { note("keyNote", e.message, "error"); });
  }

  function upload(file) {
    file.arrayBuffer().then(function(buf) {
      return api("/upload?filename=" + encodeURIComponent(file.name), {method: "POST", body: buf});
    }).then(function(r) {
      note("fileNote", "Loaded: " + r.filename + " (" + r.rows + " rows)", "ok");
      $("preview").innerHTML = renderTable(r.preview);
    }).catch(function(e) {
      note("fileNote", e.message, "error");
    });
  }

  function clearFile() {
    api("/upload", {method: "DELETE"}).then(function() {
      $("fileInput").value = "";
      $("preview").innerHTML = "";
      note("fileNote", "");
    });
  }

  function download(format) {
    window.location = "/api/sessions/" + sessionId + "/download?format=" + format;
  }

  function saveWorkflow() {
    const body = {
      name: $("wfName").value,
      trigger: $("wfTrigger").value,
      category: $("wfCategory").value,
      steps: $("wfSteps").value.split("\n")
    };
    api("/workflows", jsonOpts("POST", body))
      .then(function(wf) {
        note("wfNote", "Saved " + wf.name, "ok");
        $("wfName").value = "";
        $("wfSteps").value = "";
        refreshWorkflows();
      })
      .catch(function(e) { note("wfNote", e.message, "error"); });
  }

  function refreshWorkflows() {
    api("/workflows").then(function(list) {
      $("wfList").innerHTML = list.map(function(wf) {
        return "<li>" + escapeHtml(wf.name) + " (" + wf.steps.length + " steps, " + escapeHtml(wf.trigger) + ")</li>";
      }).join("");
    });
  }

  function refreshHistory() {
    api("/history").then(function(list) {
      $("history").innerHTML = list.length
        ? list.map(function(t) { return "<li>&#10004; " + escapeHtml(t.name) + " &mdash; " + t.time + "</li>"; }).join("")
        : "<li>No tasks yet</li>";
    });
  }

  // -------------------------------------------------------------------
  // Event listeners
  // -------------------------------------------------------------------

  sendBtn.addEventListener("click", sendMessage);
  inputEl.addEventListener("keydown", function(e) {
    if (e.key === "Enter" && !e.shiftKey) {
      e.preventDefault();
      sendMessage();
    }
  });
  $("saveKey").addEventListener("click", saveKey);
  $("fileInput").addEventListener("change", function(e) {
    if (e.target.files.length) upload(e.target.files[0]);
  });
  $("clearFile").addEventListener("click", clearFile);
  $("dlCsv").addEventListener("click", function() { download("csv"); });
  $("dlXlsx").addEventListener("click", function() { download("xlsx"); });
  $("wfSave").addEventListener("click", saveWorkflow);

  // -------------------------------------------------------------------
  // Init
  // -------------------------------------------------------------------

  fetch("/api/sessions", {method: "POST"})
    .then(function(resp) { return resp.json(); })
    .then(function(r) { sessionId = r.id; })
    .then(function() { return fetch("/api/status"); })
    .then(function(resp) { return resp.json(); })
    .then(function(s) {
      if (s.credential_configured) note("keyNote", "Using the server's " + s.provider + " key", "ok");
    });
})();
</script>
</body>
</html>
"##;
