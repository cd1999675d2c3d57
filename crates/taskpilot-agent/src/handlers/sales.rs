//! Sales pipeline synthesis.

use chrono::{DateTime, Duration, TimeZone};
use rand::Rng;
use rand::seq::SliceRandom;

use taskpilot_table::{Cell, Table};

use super::DATE_FORMAT;
use crate::error::Result;
use crate::output::TaskOutput;

pub const COLUMNS: [&str; 5] = ["Lead", "Stage", "Value", "Probability", "Expected Close"];
pub const STAGES: [&str; 5] = ["Prospect", "Qualified", "Proposal", "Negotiation", "Closed"];
pub const LEADS: usize = 10;

pub fn run<Tz, R>(now: &DateTime<Tz>, rng: &mut R) -> Result<TaskOutput>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
    R: Rng + ?Sized,
{
    let mut table = Table::new(COLUMNS);
    for i in 1..=LEADS {
        let stage = STAGES.choose(rng).copied().unwrap_or(STAGES[0]);
        let value: i64 = rng.gen_range(10_000..=100_000);
        let probability: i64 = rng.gen_range(10..=90);
        let close = now.clone() + Duration::days(rng.gen_range(7..=90));
        table.push_row(vec![
            Cell::Text(format!("Company_{i}")),
            Cell::from(stage),
            Cell::Int(value),
            Cell::Int(probability),
            Cell::Text(close.format(DATE_FORMAT).to_string()),
        ])?;
    }
    Ok(TaskOutput::Table {
        table,
        summary: "Generated Sales Pipeline".into(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn ten_leads_within_ranges() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let out = run(&now, &mut rng).unwrap();
        let table = out.table().unwrap();

        assert_eq!(table.row_count(), LEADS);
        assert_eq!(table.get(0, "Lead").unwrap().as_text(), Some("Company_1"));
        assert_eq!(table.get(9, "Lead").unwrap().as_text(), Some("Company_10"));

        for row in 0..LEADS {
            let stage = table.get(row, "Stage").unwrap().as_text().unwrap();
            assert!(STAGES.contains(&stage));
            let value = table.get(row, "Value").unwrap().as_int().unwrap();
            assert!((10_000..=100_000).contains(&value));
            let prob = table.get(row, "Probability").unwrap().as_int().unwrap();
            assert!((10..=90).contains(&prob));

            let close = table.get(row, "Expected Close").unwrap().as_text().unwrap();
            let close = NaiveDate::parse_from_str(close, DATE_FORMAT).unwrap();
            let days = (close - now.date_naive()).num_days();
            assert!((7..=90).contains(&days), "{days} days out");
        }
        assert_eq!(out.render(), "Generated Sales Pipeline");
    }

    #[test]
    fn seeded_runs_match() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let a = run(&now, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        let b = run(&now, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }
}
