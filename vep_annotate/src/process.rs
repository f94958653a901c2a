use std::ffi::OsString;
use std::fs;
use std::sync::Arc;

use crate::common::defs::{OutputType, Plugin};
use crate::common::utils::{self, Pipeline};
use crate::config::cache::VepCache;
use crate::config::VepJob;

/// Arguments for the view stage feeding the annotation tool.
fn view_stage_args(job: &VepJob) -> Vec<OsString> {
    vec!["view".into(), job.calls.clone().into_os_string()]
}

// One --plugin value. Known plugins take their data file from the
// plugin directory; anything else uses the resource registered under
// the lowercased plugin name or, failing that, no data file at all.
fn plugin_arg(job: &VepJob, plugin: &Plugin) -> String {
    match plugin.bundled_data() {
        Some(fname) => format!("{},{}", plugin, job.plugins_dir.join(fname).display()),
        None => match job.resource(&plugin.name().to_lowercase()) {
            Some(path) => format!("{},{}", plugin, path.display()),
            None => {
                debug!("No data file registered for plugin {}", plugin);
                format!("{},", plugin)
            }
        },
    }
}

/// Arguments for the annotation stage, in the order the command line is
/// assembled: extra flags, forking, input format, output format, cache,
/// references, plugins, then the output and stats paths.
fn vep_stage_args(job: &VepJob, cache: Option<&VepCache>) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    if let Some(extra) = &job.extra {
        args.extend(extra.split_ascii_whitespace().map(OsString::from));
    }
    if job.threads > 1 {
        args.push("--fork".into());
        args.push(job.threads.to_string().into());
    }
    args.push("--format".into());
    args.push("vcf".into());
    let otype = OutputType::from_path(&job.output);
    if otype.compress {
        args.push("--compress_output".into());
        args.push("gzip".into());
    }
    if let Some(fmt) = otype.format {
        args.push(fmt.flag().into());
    }
    if let Some(cache) = cache {
        cache.add_args(&mut args);
    }
    if let Some(gff) = job.gff() {
        args.push("--gff".into());
        args.push(gff.as_os_str().to_owned());
    }
    if let Some(fasta) = job.fasta() {
        args.push("--fasta".into());
        args.push(fasta.as_os_str().to_owned());
    }
    args.push("--dir_plugins".into());
    args.push(job.plugins_dir.clone().into_os_string());
    for plugin in job.plugins.iter() {
        args.push("--plugin".into());
        args.push(plugin_arg(job, plugin).into());
    }
    args.push("--output_file".into());
    args.push(job.output.clone().into_os_string());
    args.push("--stats_file".into());
    args.push(job.stats.clone().into_os_string());
    args
}

pub fn run(job: &VepJob) -> Result<(), String> {
    let sig = utils::install_signal_handlers();
    utils::check_signal(Arc::clone(&sig))?;

    // The cache layout is the one precondition checked before anything
    // is spawned
    let cache = match job.cache() {
        Some(root) => Some(VepCache::from_root(root).map_err(|e| e.to_string())?),
        None => None,
    };
    let view_args = view_stage_args(job);
    let vep_args = vep_stage_args(job, cache.as_ref());

    let mut pipeline = Pipeline::new();
    pipeline
        .add_stage(&job.bcftools, view_args)
        .add_stage(&job.vep, vep_args);
    if job.dry_run {
        println!("{}", pipeline);
        return Ok(());
    }
    for path in [&job.output, &job.stats] {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    format!(
                        "Couldn't create output directory {}: {}",
                        parent.display(),
                        e
                    )
                })?;
            }
        }
    }
    pipeline.add_output(&job.output).add_output(&job.stats);
    if let Some(log) = &job.log {
        pipeline.log_file(log.clone());
    }
    pipeline.run(sig)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn test_job() -> VepJob {
        VepJob {
            calls: PathBuf::from("calls.bcf"),
            output: PathBuf::from("annotated.vcf.gz"),
            stats: PathBuf::from("annotated.stats.html"),
            threads: 1,
            extra: None,
            plugins: vec![Plugin::from("LoFtool"), Plugin::from("CADD")],
            plugins_dir: PathBuf::from("/p"),
            resources: HashMap::new(),
            log: None,
            dry_run: false,
            bcftools: PathBuf::from("/usr/bin/bcftools"),
            vep: PathBuf::from("/usr/bin/vep"),
        }
    }

    fn str_args(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|s| s.to_string_lossy().into_owned())
            .collect()
    }

    fn plugin_values(args: &[String]) -> Vec<&str> {
        args.iter()
            .zip(args.iter().skip(1))
            .filter(|(flag, _)| flag.as_str() == "--plugin")
            .map(|(_, value)| value.as_str())
            .collect()
    }

    #[test]
    fn view_stage_reads_the_call_set() {
        let args = str_args(view_stage_args(&test_job()));
        assert_eq!(args, ["view", "calls.bcf"]);
    }

    #[test]
    fn plugin_flags_keep_order_and_pick_sources() {
        let mut job = test_job();
        job.resources
            .insert("cadd".to_owned(), PathBuf::from("/data/cadd.vcf"));
        let args = str_args(vep_stage_args(&job, None));
        assert_eq!(
            plugin_values(&args),
            ["LoFtool,/p/LoFtool_scores.txt", "CADD,/data/cadd.vcf"]
        );
    }

    #[test]
    fn missing_plugin_resource_gives_an_empty_value() {
        let mut job = test_job();
        job.plugins = vec![Plugin::from("CADD")];
        let args = str_args(vep_stage_args(&job, None));
        assert_eq!(plugin_values(&args), ["CADD,"]);
        // An empty registered path counts as absent
        job.resources.insert("cadd".to_owned(), PathBuf::new());
        let args = str_args(vep_stage_args(&job, None));
        assert_eq!(plugin_values(&args), ["CADD,"]);
    }

    #[test]
    fn bundled_values_file_for_exacpli() {
        let mut job = test_job();
        job.plugins = vec![Plugin::from("ExACpLI")];
        let args = str_args(vep_stage_args(&job, None));
        assert_eq!(plugin_values(&args), ["ExACpLI,/p/ExACpLI_values.txt"]);
    }

    #[test]
    fn fork_flag_only_above_one_thread() {
        let job = test_job();
        let args = str_args(vep_stage_args(&job, None));
        assert!(!args.iter().any(|a| a == "--fork"));
        let mut job = test_job();
        job.threads = 4;
        let args = str_args(vep_stage_args(&job, None));
        let ix = args
            .iter()
            .position(|a| a == "--fork")
            .expect("--fork expected");
        assert_eq!(args[ix + 1], "4");
    }

    #[test]
    fn compressed_output_keeps_format_flag() {
        let job = test_job();
        let args = str_args(vep_stage_args(&job, None));
        let compress = args
            .iter()
            .position(|a| a == "--compress_output")
            .expect("--compress_output expected");
        assert_eq!(args[compress + 1], "gzip");
        let vcf = args.iter().position(|a| a == "--vcf").expect("--vcf expected");
        assert!(compress < vcf);
    }

    #[test]
    fn unknown_extension_emits_no_format_flag() {
        let mut job = test_job();
        job.output = PathBuf::from("calls.xyz");
        let args = str_args(vep_stage_args(&job, None));
        for flag in ["--bcf", "--vcf", "--json", "--tab", "--compress_output"] {
            assert!(!args.iter().any(|a| a == flag), "{} unexpected", flag);
        }
    }

    #[test]
    fn full_argument_order() -> Result<(), String> {
        let tmp = tempfile::tempdir().map_err(|e| e.to_string())?;
        fs::create_dir_all(tmp.path().join("homo_sapiens_refseq").join("104_GRCh38"))
            .map_err(|e| e.to_string())?;
        let cache = VepCache::from_root(tmp.path()).map_err(|e| e.to_string())?;

        let mut job = test_job();
        job.extra = Some("--everything --af_gnomad".to_owned());
        job.threads = 2;
        job.resources
            .insert("cadd".to_owned(), PathBuf::from("/data/cadd.vcf"));
        job.resources
            .insert("gff".to_owned(), PathBuf::from("genes.gff.gz"));
        job.resources
            .insert("fasta".to_owned(), PathBuf::from("ref.fa"));

        let args = str_args(vep_stage_args(&job, Some(&cache)));
        let root = tmp.path().display().to_string();
        let expected = [
            "--everything",
            "--af_gnomad",
            "--fork",
            "2",
            "--format",
            "vcf",
            "--compress_output",
            "gzip",
            "--vcf",
            "--offline",
            "--cache",
            "--dir_cache",
            root.as_str(),
            "--cache_version",
            "104",
            "--species",
            "homo_sapiens",
            "--assembly",
            "GRCh38",
            "--gff",
            "genes.gff.gz",
            "--fasta",
            "ref.fa",
            "--dir_plugins",
            "/p",
            "--plugin",
            "LoFtool,/p/LoFtool_scores.txt",
            "--plugin",
            "CADD,/data/cadd.vcf",
            "--output_file",
            "annotated.vcf.gz",
            "--stats_file",
            "annotated.stats.html",
        ];
        assert_eq!(args, expected);
        Ok(())
    }

    #[test]
    fn dry_run_stops_before_spawning() -> Result<(), String> {
        let mut job = test_job();
        job.dry_run = true;
        // The tool paths do not exist; a dry run must not try them
        run(&job)
    }
}
