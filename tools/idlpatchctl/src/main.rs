// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use anyhow::bail;
use clap::{Parser, Subcommand};
use idlpatch::{
    CodeGenerator, FilePatcher, IdlParser, PatcherOptions, ToolError, ValueTable,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "idlpatchctl")]
#[command(about = "IDL-driven default-data patcher for generated DDS publisher sources")]
#[command(version)]
struct Cli {
    /// Log filter, e.g. `info` or `idlpatch=debug`
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse IDL definitions and patch publisher sources
    Patch {
        /// Directory scanned recursively for .idl files
        #[arg(value_name = "IDL_DIR")]
        idl_dir: PathBuf,

        /// Directory scanned recursively for target sources
        #[arg(value_name = "TARGET_DIR")]
        target_dir: PathBuf,

        /// YAML file overriding the built-in value table
        #[arg(long, value_name = "FILE")]
        values: Option<PathBuf>,

        /// Target file name suffix
        #[arg(long, default_value = "PublisherApp.cxx")]
        suffix: String,

        /// Tag embedded in marker comments and backup names
        #[arg(long, default_value = "v1")]
        tag: String,

        /// Report what would change without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Write a JSON manifest of the run
        #[arg(long, value_name = "FILE")]
        manifest: Option<PathBuf>,
    },

    /// Parse IDL definitions and list the discovered types
    Inspect {
        /// Directory scanned recursively for .idl files
        #[arg(value_name = "IDL_DIR")]
        idl_dir: PathBuf,

        /// YAML file overriding the built-in value table
        #[arg(long, value_name = "FILE")]
        values: Option<PathBuf>,

        /// Show fields, cases and values per type
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the generated assignments for one struct
    Gen {
        /// Directory scanned recursively for .idl files
        #[arg(value_name = "IDL_DIR")]
        idl_dir: PathBuf,

        /// Struct to generate for, optionally scoped (`Module::Name`)
        #[arg(value_name = "STRUCT")]
        struct_name: String,

        /// Variable name rooting the assignments
        #[arg(long, default_value = "m_data")]
        var: String,

        /// YAML file overriding the built-in value table
        #[arg(long, value_name = "FILE")]
        values: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let filter =
        EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Patch {
            idl_dir,
            target_dir,
            values,
            suffix,
            tag,
            dry_run,
            manifest,
        } => cmd_patch(
            &idl_dir, &target_dir, values, suffix, tag, dry_run, manifest,
        ),
        Commands::Inspect {
            idl_dir,
            values,
            verbose,
        } => cmd_inspect(&idl_dir, values, verbose),
        Commands::Gen {
            idl_dir,
            struct_name,
            var,
            values,
        } => cmd_gen(&idl_dir, &struct_name, &var, values),
    }
}

fn load_values(path: Option<PathBuf>) -> anyhow::Result<ValueTable> {
    match path {
        Some(p) => ValueTable::from_yaml_file(&p),
        None => Ok(ValueTable::default()),
    }
}

fn parse_idl(idl_dir: &Path, table: &ValueTable) -> anyhow::Result<IdlParser> {
    tracing::info!("Parsing IDL definitions under {}", idl_dir.display());
    let mut parser = IdlParser::new(table.primitive_types());
    parser.parse_dir(idl_dir)?;
    if parser.registry().is_empty() {
        bail!(ToolError::NoTypesDiscovered(
            idl_dir.display().to_string()
        ));
    }
    tracing::info!("Discovered {} IDL type(s)", parser.registry().len());
    Ok(parser)
}

#[allow(clippy::too_many_arguments)]
fn cmd_patch(
    idl_dir: &Path,
    target_dir: &Path,
    values: Option<PathBuf>,
    suffix: String,
    tag: String,
    dry_run: bool,
    manifest: Option<PathBuf>,
) -> anyhow::Result<()> {
    let table = load_values(values)?;
    let mut parser = parse_idl(idl_dir, &table)?;
    let mut diagnostics = parser.take_diagnostics();

    let registry = parser.registry();
    let generator = CodeGenerator::new(registry, &table);
    let options = PatcherOptions {
        target_suffix: suffix,
        tool_tag: tag,
        dry_run,
    };
    tracing::info!("Patching targets under {}", target_dir.display());
    let mut patcher = FilePatcher::new(target_dir, generator, options);
    let report = patcher.run()?;
    diagnostics.extend(patcher.generator_mut().take_diagnostics());

    report.summary(&diagnostics);
    if let Some(path) = manifest {
        report.write_manifest(&path, &diagnostics)?;
    }
    if report.touched() == 0 {
        bail!(ToolError::NothingPatched {
            skipped: report.skipped.len()
        });
    }
    Ok(())
}

fn cmd_inspect(idl_dir: &Path, values: Option<PathBuf>, verbose: bool) -> anyhow::Result<()> {
    let table = load_values(values)?;
    let parser = parse_idl(idl_dir, &table)?;
    let registry = parser.registry();

    println!("Discovered {} type(s):", registry.len());
    for key in registry.sorted_keys() {
        // Scoped registry keys resolve directly.
        let Some(ty) = registry.get(&key, "") else {
            continue;
        };
        println!("  {:8} {}", ty.kind_label(), key);
        if !verbose {
            continue;
        }
        match ty {
            idlpatch::IdlType::Struct(s) => {
                for f in &s.fields {
                    println!("    {} {}", f.full_type_text, f.name);
                }
            }
            idlpatch::IdlType::Enum(e) => {
                println!("    values: {}", e.values.join(", "));
            }
            idlpatch::IdlType::Union(u) => {
                println!("    switch ({})", u.discriminator_type);
                for c in &u.cases {
                    println!("    {} {} {}", c.labels.join(" "), c.field.type_name, c.field.name);
                }
            }
            idlpatch::IdlType::Typedef(t) => {
                println!("    {} -> {}", t.base_type_text, t.resolved_base_type);
            }
        }
    }

    for diag in parser.diagnostics() {
        println!("{diag}");
    }
    Ok(())
}

fn cmd_gen(
    idl_dir: &Path,
    struct_name: &str,
    var: &str,
    values: Option<PathBuf>,
) -> anyhow::Result<()> {
    let table = load_values(values)?;
    let parser = parse_idl(idl_dir, &table)?;

    let (module, name) = struct_name
        .rsplit_once("::")
        .unwrap_or(("", struct_name));
    let mut generator = CodeGenerator::new(parser.registry(), &table);
    let lines = generator.generate_assignments(name, module, var);
    for line in &lines {
        println!("{line}");
    }
    if lines.first().is_some_and(|l| l.starts_with("// ERROR")) {
        bail!("code generation failed for '{struct_name}'");
    }
    Ok(())
}
