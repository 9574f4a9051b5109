use crate::cli::args::{ScoreArgs, ScoreFormat};
use crate::exit_codes::SUCCESS;
use gapmap_core::FrequencyMap;

pub fn run(args: ScoreArgs) -> anyhow::Result<i32> {
    let map = match FrequencyMap::load(&args.map) {
        Ok(map) => map,
        Err(e) => return Ok(super::fail(&e)),
    };

    let rate = map.rate(args.anchor, args.gap);
    match args.format {
        ScoreFormat::Text => {
            if rate.is_infinite() {
                println!("inf");
            } else {
                println!("{rate}");
            }
        }
        ScoreFormat::Json => {
            let rate_json = if rate.is_infinite() {
                serde_json::Value::from("inf")
            } else {
                serde_json::Value::from(rate)
            };
            let out = serde_json::json!({
                "anchor": args.anchor,
                "gap": args.gap,
                "rate": rate_json,
            });
            println!("{out}");
        }
    }
    Ok(SUCCESS)
}
