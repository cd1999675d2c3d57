//! Finance variance synthesis.

use std::ops::RangeInclusive;

use rand::Rng;

use taskpilot_table::{Cell, Table};

use crate::error::Result;
use crate::output::TaskOutput;

pub const COLUMNS: [&str; 4] = ["Category", "Budget", "Actual", "Variance"];

/// Category, fixed budget, and the range actual spend is drawn from.
pub const CATEGORIES: [(&str, i64, RangeInclusive<i64>); 5] = [
    ("Travel", 50_000, 40_000..=55_000),
    ("Software", 30_000, 25_000..=35_000),
    ("Marketing", 75_000, 60_000..=80_000),
    ("Office", 20_000, 15_000..=25_000),
    ("Utilities", 15_000, 12_000..=18_000),
];

pub fn run<R: Rng + ?Sized>(rng: &mut R) -> Result<TaskOutput> {
    let mut table = Table::new(COLUMNS);
    for (category, budget, range) in CATEGORIES {
        let actual = rng.gen_range(range);
        table.push_row(vec![
            Cell::from(category),
            Cell::Int(budget),
            Cell::Int(actual),
            Cell::Int(budget - actual),
        ])?;
    }
    Ok(TaskOutput::Table {
        table,
        summary: "Generated Finance Report".into(),
    })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn variance_is_budget_minus_actual() {
        for seed in 0..20 {
            let out = run(&mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
            let table = out.table().unwrap();
            assert_eq!(table.row_count(), CATEGORIES.len());

            for (row, (name, budget, range)) in CATEGORIES.iter().enumerate() {
                assert_eq!(table.get(row, "Category").unwrap().as_text(), Some(*name));
                let b = table.get(row, "Budget").unwrap().as_int().unwrap();
                let a = table.get(row, "Actual").unwrap().as_int().unwrap();
                let v = table.get(row, "Variance").unwrap().as_int().unwrap();
                assert_eq!(b, *budget);
                assert!(range.contains(&a));
                assert_eq!(v, b - a);
            }
        }
    }
}
