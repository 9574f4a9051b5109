use crate::cli::args::{BenchArgs, EngineKind};
use crate::exit_codes::{INPUT_ERROR, SUCCESS};
use gapmap_core::{run_benchmark, FrequencyMap, Predictor, PrimeSequence, TieredEngine};

pub fn run(args: BenchArgs) -> anyhow::Result<i32> {
    let predictor = match make_predictor(&args) {
        Ok(p) => p,
        Err(code) => return Ok(code),
    };

    let sequence = match PrimeSequence::from_file(&args.input) {
        Ok(seq) => seq,
        Err(e) => return Ok(super::fail(&e)),
    };

    let report = match run_benchmark(&sequence, &predictor, args.start, args.count, args.candidates)
    {
        Ok(report) => report,
        Err(e) => return Ok(super::fail(&e)),
    };

    println!(
        "predictions: {}  hits: {}  ties: {}  hit rate: {:.4}",
        report.predictions,
        report.hits,
        report.ties,
        report.hit_rate()
    );
    Ok(SUCCESS)
}

fn make_predictor(args: &BenchArgs) -> Result<Predictor, i32> {
    let load = |path: &std::path::Path| FrequencyMap::load(path).map_err(|e| super::fail(&e));

    match args.engine {
        EngineKind::Weighted => Ok(Predictor::Weighted(load(&args.mod6)?)),
        EngineKind::Tiered => {
            let (Some(mod30), Some(mod210)) = (&args.mod30, &args.mod210) else {
                eprintln!("error: the tiered engine needs --mod30 and --mod210 maps");
                return Err(INPUT_ERROR);
            };
            let mut engine = TieredEngine::new();
            engine
                .push_tier(210, load(mod210)?)
                .push_tier(30, load(mod30)?)
                .push_tier(0, load(&args.mod6)?);
            Ok(Predictor::Tiered(engine))
        }
    }
}
