use comfy_table::{Cell, Table};

use crate::cli::read_sources;
use crate::error::Result;
use crate::fmt::money;
use crate::mapper::TARGET_HEADERS;
use crate::pipeline::run_batch;

pub fn run(files: &[String], limit: usize) -> Result<()> {
    let sources = read_sources(files)?;
    let output = run_batch(&sources)?;

    let mut table = Table::new();
    table.set_header(TARGET_HEADERS.to_vec());
    for gift in output.target.iter().take(limit) {
        table.add_row(vec![
            Cell::new(&gift.account_number),
            Cell::new(&gift.first_name),
            Cell::new(&gift.last_name),
            Cell::new(&gift.organization),
            Cell::new(&gift.date),
            Cell::new(money(gift.amount)),
            Cell::new(&gift.fund),
            Cell::new(&gift.transaction_method),
            Cell::new(&gift.email),
            Cell::new(&gift.source),
        ]);
    }
    println!("{table}");

    let total: f64 = output.target.iter().map(|g| g.amount).sum();
    let shown = output.row_count().min(limit);
    println!(
        "Showing {shown} of {} rows, total {}",
        output.row_count(),
        money(total)
    );
    Ok(())
}
