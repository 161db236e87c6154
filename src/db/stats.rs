use crate::db::pool::DbPool;
use crate::db::queries::{count_by_collection, read_counter};
use crate::errors::AppResult;
use crate::store::collection::INVOICE_COUNTER;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use std::fs;

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) RECORDS PER COLLECTION
    //
    let counts = count_by_collection(&pool.conn)?;
    let total: i64 = counts.iter().map(|(_, n)| n).sum();

    println!(
        "{}• Total records:{} {}{}{}",
        CYAN, RESET, GREEN, total, RESET
    );

    if counts.is_empty() {
        println!("    {GREY}--{RESET}");
    }
    for (name, n) in &counts {
        println!("    {:<22} {}", name, n);
    }

    //
    // 3) INVOICE COUNTER
    //
    let seq = read_counter(&pool.conn, INVOICE_COUNTER)?;
    println!("{}• Invoice counter:{} {}", CYAN, RESET, seq);

    println!();
    Ok(())
}
