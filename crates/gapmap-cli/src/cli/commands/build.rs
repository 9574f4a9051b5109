use crate::cli::args::BuildArgs;
use crate::exit_codes::SUCCESS;
use gapmap_core::{build, Classifier, GapThresholds, PrimeSequence, ScanWindow};

pub fn run(args: BuildArgs) -> anyhow::Result<i32> {
    let classifier = if args.gap_categories {
        Classifier::compound(
            args.modulus,
            GapThresholds {
                small_below: args.small_below,
                large_from: args.large_from,
            },
        )
    } else {
        Classifier::residue(args.modulus)
    };

    let sequence = match PrimeSequence::from_file(&args.input) {
        Ok(seq) => seq,
        Err(e) => return Ok(super::fail(&e)),
    };

    let window = ScanWindow::new(args.start, args.count);
    let (map, report) = match build(&sequence, window, classifier, args.radius) {
        Ok(out) => out,
        Err(e) => return Ok(super::fail(&e)),
    };

    if let Err(e) = map.save(&args.output) {
        return Ok(super::fail(&e));
    }

    println!(
        "scanned {} pairs ({} failures, {} skipped) -> {}",
        report.pairs_scanned,
        report.failures,
        report.skipped,
        args.output.display()
    );
    Ok(SUCCESS)
}
