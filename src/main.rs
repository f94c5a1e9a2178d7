use anyhow::Context;
use caught::{run_safely, wrap_pending, AnyError};
use log::{info, warn};
use std::num::ParseIntError;

/// Sums the integers given on the command line and prints their mean.
/// Arguments that are not integers are skipped.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut total = 0_i64;
    let mut count = 0_i64;
    for arg in std::env::args().skip(1) {
        let value = run_safely::<Option<i64>, Option<i64>, _, _>(|| arg.parse().map(Some))
            .map_by_type::<ParseIntError>(|error| {
                info!("skipping {:?}: {}", arg, error);
                None
            })
            .or_rethrow()?;

        if let Some(value) = value {
            total = total.checked_add(value).context("sum overflows")?;
            count += 1;
        }
    }

    let mean = futures_executor::block_on(
        wrap_pending::<i64, i64, _, _>(async move {
            total.checked_div(count).context("no numbers given")
        })
        .map_by_type::<AnyError>(|error| {
            warn!("{}", error);
            0
        })
        .and_return(),
    );

    println!("{}", mean.unwrap_or_default());
    Ok(())
}
