//! mtree - browse YAML manifests by kind, label and namespace

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = manifest_tree::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
