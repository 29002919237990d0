//! `flyc` CLI entry point.
//!
//! Argv parsing here is deliberately thin: the real CLI grammar is an
//! external collaborator's job (`spec.md §1`). Lexing/parsing a `.fly`
//! source file is equally out of scope, so the program compiled here is
//! always [`flyc::demo::build_fail_ladder`] — a stand-in for the module an
//! external parser would otherwise hand to [`flyc::compile`].

use fly_diagnostic::{Diagnostic, DiagnosticQueue, Severity};
use flyc::{CompileOptions, DriverError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let (options, out_dir) = match parse_args(env::args().skip(1)) {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("flyc: {err}");
            return ExitCode::FAILURE;
        }
    };

    let program = flyc::demo::build_fail_ladder();
    let mut diagnostics = DiagnosticQueue::new();
    let result = flyc::compile(&program.modules, &program.registry, &program.interner, &mut diagnostics, &options);
    report_diagnostics(&diagnostics);

    match result {
        Ok(compiled) => {
            if let Some(dir) = out_dir {
                if let Err(err) = write_outputs(&dir, &compiled) {
                    eprintln!("flyc: {err}");
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("flyc: {err}");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(CompileOptions, Option<PathBuf>), DriverError> {
    let mut options = CompileOptions::default();
    let mut out_dir = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--emit-llvm" => options.emit_llvm_to_stdout = true,
            "-o" => {
                let Some(path) = args.next() else {
                    return Err(DriverError::BadArgument("-o requires a directory argument".to_string()));
                };
                out_dir = Some(PathBuf::from(path));
            }
            "--target" => {
                let Some(triple) = args.next() else {
                    return Err(DriverError::BadArgument("--target requires a triple argument".to_string()));
                };
                options.target_triple = Some(triple);
            }
            other => return Err(DriverError::BadArgument(other.to_string())),
        }
    }
    Ok((options, out_dir))
}

fn write_outputs(dir: &Path, compiled: &[flyc::CompiledModule]) -> Result<(), DriverError> {
    fs::create_dir_all(dir).map_err(|source| DriverError::Io { path: dir.display().to_string(), source })?;
    for module in compiled {
        let path = dir.join(format!("{}.ll", module.name));
        fs::write(&path, &module.llvm_ir).map_err(|source| DriverError::Io { path: path.display().to_string(), source })?;
    }
    Ok(())
}

fn report_diagnostics(diagnostics: &DiagnosticQueue) {
    for diagnostic in diagnostics.diagnostics() {
        eprintln!("{}", format_diagnostic(diagnostic));
    }
}

fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    let severity = match diagnostic.severity {
        Severity::Note => "note",
        Severity::Warning => "warning",
        Severity::Error => "error",
        Severity::Fatal => "fatal error",
    };
    format!("{severity}[{}]: {}", diagnostic.code, diagnostic.message)
}
