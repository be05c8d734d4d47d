use std::path::{Path, PathBuf};

use tracing::{info, warn};

use fesprite::api;
use fesprite::{CompositeMode, CompositeParams};

use super::args::CliArgs;
use super::errors::AppError;

/// Parse the "X,Y" offset argument into a signed pair.
fn parse_offset(offset: &str) -> Result<(i64, i64), AppError> {
    let invalid = || AppError::InvalidOffset {
        offset: offset.to_string(),
    };
    let (x, y) = offset.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse::<i64>().map_err(|_| invalid())?;
    let y = y.trim().parse::<i64>().map_err(|_| invalid())?;
    Ok((x, y))
}

fn composite_single(
    root: &Path,
    head: &str,
    body: &str,
    output: &PathBuf,
    params: &CompositeParams,
) -> Result<(), Box<dyn std::error::Error>> {
    api::composite_to_path(root, head, body, params, output)?;
    Ok(())
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    let root = args.input_dir.as_path();

    if args.prepare {
        let report = api::prepare_directory(root)?;
        info!(
            "Prepared {} head sheet(s) and {} body sheet(s)",
            report.heads, report.bodies
        );
    }
    if args.scan {
        let (heads, bodies) = api::scan_sheets(root)?;
        info!("Registered {} head sheet(s) and {} body sheet(s)", heads, bodies);
    }

    let batch_mode = args.batch || args.output_dir.is_some();
    let maintenance_only =
        (args.prepare || args.scan) && !batch_mode && args.head.is_none() && args.body.is_none();
    if maintenance_only {
        return Ok(());
    }

    let params = CompositeParams {
        mode: args.mode,
        alpha: !args.no_alpha,
        offset: parse_offset(&args.offset)?,
        sidecar: args.sidecar,
    };

    if batch_mode {
        let head = args.head.ok_or(AppError::MissingArgument {
            arg: "--head".to_string(),
        })?;
        let output_dir = args.output_dir.ok_or(AppError::MissingArgument {
            arg: "--output-dir".to_string(),
        })?;

        std::fs::create_dir_all(&output_dir)?;

        info!("Starting batch compositing for head: {}", head);
        info!("Output directory: {:?}", output_dir);

        let mut processed = 0;
        let mut skipped = 0;
        let mut errors = 0;

        for body in api::iterate_body_classes(root)? {
            let output_name = format!("{}_{}.png", head, body);
            let output_path = output_dir.join(&output_name);

            info!("Compositing: {} + {} -> {:?}", head, body, output_path);

            match composite_single(root, &head, &body, &output_path, &params) {
                Ok(()) => {
                    processed += 1;
                }
                Err(e) => {
                    if let Some(fesprite::Error::Sheet(fesprite::SheetError::Missing { path })) =
                        e.downcast_ref::<fesprite::Error>()
                    {
                        warn!("Skipping {}: sheet {} is missing", body, path.display());
                        skipped += 1;
                    } else {
                        warn!("Error compositing {} + {}: {}", head, body, e);
                        errors += 1;
                    }
                }
            }
        }

        info!("Batch compositing complete!");
        info!("Processed: {}", processed);
        info!("Skipped: {}", skipped);
        info!("Errors: {}", errors);
    } else {
        let head = args.head.ok_or(AppError::MissingArgument {
            arg: "--head".to_string(),
        })?;
        let body = args.body.ok_or(AppError::MissingArgument {
            arg: "--body".to_string(),
        })?;
        let output = match args.output {
            Some(output) => output,
            None => PathBuf::from(format!("{}_{}.png", head, body)),
        };

        composite_single(root, &head, &body, &output, &params)?;
        info!("Successfully composited: {} + {} -> {:?}\n", head, body, output);
        if params.mode == CompositeMode::Idle {
            info!("(idle frames only; pass --mode full for move frames)");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_offset;

    #[test]
    fn offsets_parse() {
        assert_eq!(parse_offset("0,0").unwrap(), (0, 0));
        assert_eq!(parse_offset("3, -2").unwrap(), (3, -2));
        assert_eq!(parse_offset("-10,24").unwrap(), (-10, 24));
    }

    #[test]
    fn bad_offsets_are_rejected() {
        assert!(parse_offset("0").is_err());
        assert!(parse_offset("a,b").is_err());
        assert!(parse_offset("1,2,3").is_err());
        assert!(parse_offset("").is_err());
    }
}
