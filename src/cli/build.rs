//! Build command - compile every selected (operation, data type) variant

use super::output;
use clap::{Args, ValueEnum};
use spvbake_core::prelude::*;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Args)]
pub struct BuildArgs {
    /// Operations or families to build, comma separated (default: all)
    #[arg(short, long, value_name = "NAMES")]
    pub targets: Option<String>,

    /// Directory that receives TensorOp/{Op}-{DType}.spv
    #[arg(short, long, default_value = "Shaders")]
    pub output_dir: PathBuf,

    /// Run the optimizer over every compiled binary
    #[arg(long)]
    pub optimize: bool,

    /// Optimizer goal (only used with --optimize)
    #[arg(long, value_enum, default_value = "performance")]
    pub opt_level: OptLevelArg,

    /// Shader source directory holding TensorOp/*.comp and the shared includes
    #[arg(long, env = "SPVBAKE_SOURCE_ROOT", default_value = ".")]
    pub source_root: PathBuf,

    /// Variants compiled concurrently (0 = one per CPU)
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,

    /// Print the commands without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Shader compiler executable
    #[arg(long, env = "SPVBAKE_GLSLANG", default_value = "glslang")]
    pub compiler: PathBuf,

    /// SPIR-V optimizer executable
    #[arg(long, env = "SPVBAKE_SPIRV_OPT", default_value = "spirv-opt")]
    pub optimizer: PathBuf,

    /// Compiler target environment
    #[arg(long, default_value = "spirv1.6")]
    pub target_env: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OptLevelArg {
    Performance,
    Size,
}

impl From<OptLevelArg> for OptLevel {
    fn from(level: OptLevelArg) -> Self {
        match level {
            OptLevelArg::Performance => OptLevel::Performance,
            OptLevelArg::Size => OptLevel::Size,
        }
    }
}

impl BuildArgs {
    fn resolved_jobs(&self) -> usize {
        if self.jobs == 0 {
            std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
        } else {
            self.jobs
        }
    }

    pub fn to_config(&self) -> BuildConfig {
        let toolchain = Toolchain {
            compiler: self.compiler.clone(),
            optimizer: self.optimizer.clone(),
            target_env: TargetEnv(self.target_env.clone()),
        };
        BuildConfig::new(&self.output_dir)
            .with_targets(self.targets.as_deref().and_then(TargetFilter::parse))
            .with_source_root(&self.source_root)
            .with_optimization(self.optimize)
            .with_opt_level(self.opt_level.into())
            .with_toolchain(toolchain)
            .with_jobs(self.resolved_jobs())
    }
}

fn write_commands(groups: &[CommandGroup], out: &mut impl Write) -> io::Result<()> {
    for command in groups.iter().flat_map(|g| &g.commands) {
        writeln!(out, "{}", command.command_line())?;
    }
    out.flush()
}

/// Writes one command line per tool invocation. A closed reader (`| head`)
/// ends the listing quietly.
fn print_commands(groups: &[CommandGroup], out: &mut impl Write) -> io::Result<()> {
    match write_commands(groups, out) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result,
    }
}

pub fn execute(args: BuildArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.to_config();
    let catalog = Catalog::builtin();

    if let Some(targets) = &config.targets {
        let unmatched = targets.unmatched(&catalog);
        if !unmatched.is_empty() {
            output::warning(&format!("no operation matches: {}", unmatched.join(", ")));
        }
    }

    let variants = expand(&catalog, &config);
    tracing::debug!(
        output_dir = %config.output_dir.display(),
        source_root = %config.source_root.display(),
        jobs = config.jobs,
        optimize = config.enable_optimization,
        "resolved build configuration"
    );
    let groups = synthesize_all(&variants, &config);
    let commands: usize = groups.iter().map(|g| g.commands.len()).sum();

    if args.dry_run {
        output::planning(&format!("{} variants ({} commands)", groups.len(), commands));
        print_commands(&groups, &mut io::stdout().lock())?;
        return Ok(());
    }

    if groups.is_empty() {
        output::skipping("nothing to build");
    } else {
        config.toolchain.check(config.enable_optimization)?;
    }

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            cancel.cancel();
            eprintln!("\nCancelling...");
        })
        .ok();
    }

    let progress = |event: &BuildEvent<'_>| {
        if let BuildEvent::Started { group, index, total } = event {
            output::compiling(&format!("{} ({}/{})", group.name(), index + 1, total));
        }
    };

    let runner = BatchRunner::new(ProcessExecutor::new())
        .with_jobs(config.jobs)
        .with_cancel_token(cancel)
        .with_progress(Box::new(progress));
    let summary = runner.run(&groups, &config.output_dir)?;

    output::finished(&format!(
        "{} variants ({} commands) in {}",
        summary.variants,
        summary.commands,
        output::format_duration(summary.elapsed.as_secs_f64())
    ));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn parse(args: &[&str]) -> BuildArgs {
        let cli = Cli::try_parse_from(std::iter::once("spvbake").chain(args.iter().copied())).unwrap();
        match cli.command {
            crate::cli::Commands::Build(args) => args,
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["build", "--compiler", "glslang", "--optimizer", "spirv-opt", "--source-root", "."]);
        let config = args.to_config();

        assert!(config.targets.is_none());
        assert_eq!(config.output_dir, PathBuf::from("Shaders"));
        assert!(!config.enable_optimization);
        assert_eq!(config.opt_level, OptLevel::Performance);
        assert_eq!(config.jobs, 1);
        assert_eq!(config.toolchain.target_env, TargetEnv::default());
        assert!(!args.dry_run);
    }

    #[test]
    fn test_targets_and_optimization() {
        let args = parse(&["build", "--targets", "Add, Fill", "--optimize", "--opt-level", "size", "-o", "out"]);
        let config = args.to_config();

        let targets = config.targets.unwrap();
        assert_eq!(targets.names().collect::<Vec<_>>(), ["Add", "Fill"]);
        assert!(config.enable_optimization);
        assert_eq!(config.opt_level, OptLevel::Size);
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_empty_targets_build_all() {
        let config = parse(&["build", "--targets", ""]).to_config();
        assert!(config.targets.is_none());
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("spvbake_cli_{}_{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn test_unknown_target_builds_nothing() {
        let out = scratch_dir("no_such_op");
        let args = parse(&["build", "--targets", "NoSuchOp", "-o", out.to_str().unwrap()]);

        assert!(execute(args).is_ok());
        assert!(out.join("TensorOp").is_dir());
        assert!(std::fs::read_dir(out.join("TensorOp")).unwrap().next().is_none());

        let _ = std::fs::remove_dir_all(&out);
    }

    #[test]
    fn test_missing_compiler_fails_before_output() {
        let out = scratch_dir("missing_compiler");
        let args = parse(&[
            "build",
            "--targets",
            "Fill",
            "--compiler",
            "spvbake-no-such-compiler",
            "-o",
            out.to_str().unwrap(),
        ]);

        let err = execute(args).unwrap_err();
        let expected = BakeError::ToolNotFound {
            program: "spvbake-no-such-compiler".into(),
        };
        assert_eq!(err.to_string(), expected.to_string());
        assert!(!out.exists());
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let out = scratch_dir("dry_run");
        let args = parse(&[
            "build",
            "--dry-run",
            "--targets",
            "Add",
            "--compiler",
            "spvbake-no-such-compiler",
            "-o",
            out.to_str().unwrap(),
        ]);

        assert!(execute(args).is_ok());
        assert!(!out.exists());
    }

    #[test]
    fn test_dry_run_lists_every_command() {
        let config = parse(&["build", "--targets", "Fill", "--optimize", "-o", "/out"]).to_config();
        let groups = synthesize_all(&expand(&Catalog::builtin(), &config), &config);

        let mut buf = Vec::new();
        print_commands(&groups, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 28);
        assert_eq!(lines[0], groups[0].commands[0].command_line());
        assert!(lines[1].ends_with(" -O"));
    }

    #[test]
    fn test_dry_run_into_closed_pipe_is_clean() {
        let config = parse(&["build", "-o", "/out"]).to_config();
        let groups = synthesize_all(&expand(&Catalog::builtin(), &config), &config);
        assert!(print_commands(&groups, &mut ClosedPipe).is_ok());
        assert!(write_commands(&groups, &mut ClosedPipe).is_err());
    }

    #[test]
    fn test_zero_jobs_uses_available_cpus() {
        let config = parse(&["build", "--jobs", "0"]).to_config();
        assert!(config.jobs >= 1);
    }
}
