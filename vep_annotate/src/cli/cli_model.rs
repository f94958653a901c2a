use std::path::PathBuf;

use clap::{crate_version, value_parser, Arg, ArgAction, Command};

use utils::log_level::LogLevel;

pub(super) fn cli_model() -> Command {
    Command::new("vep_annotate")
        .version(crate_version!())
        .about("vep_annotate streams a variant call set through bcftools view into Ensembl VEP, assembling the annotation command line from the supplied job parameters")
        .next_help_heading("output")
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .help("Annotated output file (format taken from the extension; .gz output is compressed)"),
        )
        .arg(
            Arg::new("stats")
                .short('s')
                .long("stats")
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .help("Statistics file written by the annotation tool"),
        )
        .next_help_heading("annotation")
        .arg(
            Arg::new("cache")
                .short('c')
                .long("cache")
                .value_parser(value_parser!(PathBuf))
                .value_name("DIR")
                .help("Root of a local annotation cache (enables offline mode)"),
        )
        .arg(
            Arg::new("fasta")
                .short('f')
                .long("fasta")
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .help("Genomic reference (FASTA)"),
        )
        .arg(
            Arg::new("gff")
                .short('g')
                .long("gff")
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .help("Gene model annotation (GFF)"),
        )
        .arg(
            Arg::new("extra")
                .short('e')
                .long("extra")
                .value_parser(value_parser!(String))
                .value_name("STRING")
                .help("Extra options passed through to the annotation tool (split on whitespace)"),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .value_parser(value_parser!(usize))
                .value_name("INT")
                .help("Forks for the annotation tool (no forking when 1, the default)"),
        )
        .next_help_heading("plugins")
        .arg(
            Arg::new("plugin")
                .short('p')
                .long("plugin")
                .value_parser(value_parser!(String))
                .value_name("NAME")
                .action(ArgAction::Append)
                .help("Plugin to load (can be repeated; order is kept)"),
        )
        .arg(
            Arg::new("plugins_dir")
                .short('P')
                .long("plugins-dir")
                .value_parser(value_parser!(PathBuf))
                .value_name("DIR")
                .help("Directory holding the installed plugins"),
        )
        .arg(
            Arg::new("plugin_data")
                .short('d')
                .long("plugin-data")
                .value_parser(value_parser!(String))
                .value_name("NAME=PATH")
                .action(ArgAction::Append)
                .help("Data file for a plugin without a bundled one (can be repeated)"),
        )
        .next_help_heading("general")
        .arg(
            Arg::new("job_file")
                .short('j')
                .long("job-file")
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .help("Read job parameters from a JSON file (command line options take precedence)"),
        )
        .arg(
            Arg::new("log")
                .short('l')
                .long("log")
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .help("Send stderr of the pipeline stages to this file"),
        )
        .arg(
            Arg::new("dry_run")
                .short('n')
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Print the composed pipeline and exit without running it"),
        )
        .arg(
            Arg::new("bcftools")
                .long("bcftools")
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .help("bcftools executable (otherwise taken from PATH)"),
        )
        .arg(
            Arg::new("vep")
                .long("vep")
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .help("vep executable (otherwise taken from PATH)"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .action(ArgAction::SetTrue)
                .long("quiet")
                .help("Silence all output"),
        )
        .arg(
            Arg::new("timestamp")
                .short('T')
                .long("timestamp")
                .value_parser(value_parser!(stderrlog::Timestamp))
                .value_name("GRANULARITY")
                .default_value("none")
                .help("Prepend log entries with a timestamp"),
        )
        .arg(
            Arg::new("loglevel")
                .short('v')
                .long("loglevel")
                .value_name("LOGLEVEL")
                .value_parser(value_parser!(LogLevel))
                .default_value("info")
                .help("Set log level"),
        )
        .arg(
            Arg::new("calls")
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .help("Input call set (VCF/BCF)"),
        )
}
