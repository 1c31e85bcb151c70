//! Compiler command synthesis
//!
//! Turns a [`BuildVariant`] into the exact tool invocations that produce its
//! artifact:
//!
//! ```text
//! glslang <root>/TensorOp/<template> -o <artifact> -V --target-env spirv1.6 \
//!         -D<Op>=Operation -DDATA_TYPE_ID=<code> -I<root>
//! spirv-opt <artifact> -o <artifact> -O          (only with optimization)
//! ```

use crate::config::BuildConfig;
use crate::types::{OptLevel, TargetEnv, DATA_TYPE_ID, OPERATION_MACRO, TENSOR_OP_DIR};
use crate::variant::BuildVariant;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// A `-D<symbol>=<value>` substitution.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Define {
    pub symbol: String,
    pub value: String,
}

impl Define {
    pub fn new(symbol: impl Into<String>, value: impl ToString) -> Self {
        Self {
            symbol: symbol.into(),
            value: value.to_string(),
        }
    }

    pub fn to_arg(&self) -> String {
        format!("-D{}={}", self.symbol, self.value)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Step {
    Compile {
        template: PathBuf,
        output: PathBuf,
        target_env: TargetEnv,
        defines: Vec<Define>,
        include_dir: PathBuf,
    },
    /// Runs after, and only after, the compile step of the same variant.
    Optimize {
        input: PathBuf,
        output: PathBuf,
        level: OptLevel,
    },
}

/// One external tool invocation.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CompileCommand {
    pub program: PathBuf,
    pub step: Step,
}

impl CompileCommand {
    pub fn is_optimize(&self) -> bool {
        matches!(self.step, Step::Optimize { .. })
    }

    /// The file this command writes.
    pub fn output_path(&self) -> &Path {
        match &self.step {
            Step::Compile { output, .. } | Step::Optimize { output, .. } => output,
        }
    }

    /// Arguments passed to [`program`](Self::program), in order.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        match &self.step {
            Step::Compile {
                template,
                output,
                target_env,
                defines,
                include_dir,
            } => {
                args.push(template.into());
                args.push("-o".into());
                args.push(output.into());
                args.push("-V".into());
                args.push("--target-env".into());
                args.push(target_env.0.clone().into());
                args.extend(defines.iter().map(|d| OsString::from(d.to_arg())));
                let mut include = OsString::from("-I");
                include.push(include_dir);
                args.push(include);
            },
            Step::Optimize { input, output, level } => {
                args.push(input.into());
                args.push("-o".into());
                args.push(output.into());
                args.push(level.flag().into());
            },
        }
        args
    }

    /// Printable command line, quoting arguments that contain whitespace.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_os_str().to_os_string())
            .chain(self.args())
            .map(|arg| quote(&arg.to_string_lossy()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn quote(arg: &str) -> String {
    if arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'') {
        format!("\"{}\"", arg.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}

/// The ordered commands that build one variant.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CommandGroup {
    pub variant: BuildVariant,
    pub commands: Vec<CompileCommand>,
}

impl CommandGroup {
    pub fn name(&self) -> String {
        self.variant.name()
    }
}

/// Compile command for `variant`, followed by an in-place optimize command
/// when the config enables optimization.
pub fn synthesize(variant: &BuildVariant, config: &BuildConfig) -> CommandGroup {
    let op = &variant.operation;
    let output = variant.artifact_path(&config.output_dir);
    let template = config.source_root.join(TENSOR_OP_DIR).join(op.kind.file_name());

    let mut commands = vec![CompileCommand {
        program: config.toolchain.compiler.clone(),
        step: Step::Compile {
            template,
            output: output.clone(),
            target_env: config.toolchain.target_env.clone(),
            defines: vec![
                Define::new(op.symbol, OPERATION_MACRO),
                Define::new(DATA_TYPE_ID, variant.dtype.code()),
            ],
            include_dir: config.source_root.clone(),
        },
    }];

    if config.enable_optimization {
        commands.push(CompileCommand {
            program: config.toolchain.optimizer.clone(),
            step: Step::Optimize {
                input: output.clone(),
                output,
                level: config.opt_level,
            },
        });
    }

    CommandGroup {
        variant: *variant,
        commands,
    }
}

pub fn synthesize_all(variants: &[BuildVariant], config: &BuildConfig) -> Vec<CommandGroup> {
    variants.iter().map(|variant| synthesize(variant, config)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::types::DType;

    fn add_scalar_f32() -> BuildVariant {
        BuildVariant::new(*Catalog::builtin().find("AddScalar").unwrap(), DType::F32)
    }

    #[test]
    fn test_compile_args() {
        let config = BuildConfig::new("/out").with_source_root("/src/Shaders");
        let group = synthesize(&add_scalar_f32(), &config);
        assert_eq!(group.commands.len(), 1);
        assert_eq!(
            group.commands[0].command_line(),
            "glslang /src/Shaders/TensorOp/ElementWiseUnary.comp -o /out/TensorOp/AddScalar-Float32.spv \
             -V --target-env spirv1.6 -DAddScalar=Operation -DDATA_TYPE_ID=2 -I/src/Shaders"
        );
    }

    #[test]
    fn test_optimize_follows_compile() {
        let config = BuildConfig::new("/out")
            .with_optimization(true)
            .with_opt_level(OptLevel::Size);
        let group = synthesize(&add_scalar_f32(), &config);
        assert_eq!(group.commands.len(), 2);
        assert!(!group.commands[0].is_optimize());
        assert!(group.commands[1].is_optimize());
        assert_eq!(
            group.commands[1].command_line(),
            "spirv-opt /out/TensorOp/AddScalar-Float32.spv -o /out/TensorOp/AddScalar-Float32.spv -Os"
        );
    }

    #[test]
    fn test_templates_by_kind() {
        let config = BuildConfig::new("out").with_source_root("root");
        let catalog = Catalog::builtin();
        for (name, template) in [
            ("Fill", "ForEach.comp"),
            ("DivideScalar", "ElementWiseUnary.comp"),
            ("Remainder", "ElementWiseBinary.comp"),
        ] {
            let variant = BuildVariant::new(*catalog.find(name).unwrap(), DType::I64);
            let group = synthesize(&variant, &config);
            match &group.commands[0].step {
                Step::Compile { template: path, .. } => {
                    assert_eq!(path, &Path::new("root").join("TensorOp").join(template));
                },
                Step::Optimize { .. } => panic!("first command must compile"),
            }
        }
    }

    #[test]
    fn test_quote_paths_with_spaces() {
        assert_eq!(quote("/my shaders/out.spv"), "\"/my shaders/out.spv\"");
        assert_eq!(quote("-O"), "-O");
    }
}
