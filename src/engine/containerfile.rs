//! Containerfile Engine
//!
//! Translates a `ResolutionPlan` into an ordered sequence of Containerfile
//! instructions and renders them as text.
//!
//! # Instruction Order
//!
//! | Step | Emitted when |
//! |------|--------------|
//! | `FROM <base>` | always |
//! | update | `image.update` |
//! | remove | removal set is non-empty |
//! | install (per category or batched) | packages resolved |
//! | clean | packages were installed |
//! | `COPY` per file | `files` modules |
//! | `systemctl enable/disable` | `systemd` modules |
//! | script commands | `script` modules |
//! | `bootc container lint` | `image.lint` |
//!
//! # Design
//!
//! - **Pure logic**: `generate` has no I/O; only `write_containerfile` touches disk
//! - **Deterministic**: identical plans render to byte-identical text

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{BootcraftError, Result};
use crate::logic::resolver::ResolutionPlan;
use crate::package_utils::join_quoted;
use crate::types::{InstallMode, PackageOp};

/// Final validation step for bootc images
pub const LINT_COMMAND: &str = "bootc container lint";

/// A single Containerfile line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Comment(String),
    From(String),
    Run(String),
    Copy { source: String, destination: String },
    Blank,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Comment(text) => write!(f, "# {}", text),
            Instruction::From(image) => write!(f, "FROM {}", image),
            Instruction::Run(cmd) => write!(f, "RUN {}", cmd),
            Instruction::Copy {
                source,
                destination,
            } => {
                if source.contains(char::is_whitespace) || destination.contains(char::is_whitespace)
                {
                    // JSON form keeps paths with spaces intact
                    let args = serde_json::to_string(&[source, destination]).map_err(|_| fmt::Error)?;
                    write!(f, "COPY {}", args)
                } else {
                    write!(f, "COPY {} {}", source, destination)
                }
            }
            Instruction::Blank => Ok(()),
        }
    }
}

/// Build the instruction sequence for a plan
pub fn generate_instructions(plan: &ResolutionPlan) -> Vec<Instruction> {
    let profile = plan.profile;
    let packages = &plan.resolution.packages;
    let mut out = Vec::new();

    let origin = if plan.resolution.sources.is_empty() {
        "no package sets".to_string()
    } else {
        plan.resolution.sources.join(", ")
    };
    out.push(Instruction::Comment(format!(
        "Generated by bootcraft ({} profile) from {}. Do not edit.",
        profile, origin
    )));
    out.push(Instruction::From(plan.base_image().to_string()));

    if plan.image.update {
        out.push(Instruction::Blank);
        out.push(Instruction::Run(profile.template(PackageOp::Update).to_string()));
    }

    if !plan.resolution.removals.is_empty() {
        out.push(Instruction::Blank);
        out.push(Instruction::Comment("removed packages".to_string()));
        out.push(Instruction::Run(
            profile.render(PackageOp::Remove, &plan.resolution.removals),
        ));
    }

    if !packages.is_empty() {
        out.push(Instruction::Blank);
        match plan.image.install_mode {
            InstallMode::PerCategory => {
                for category in packages.categories() {
                    out.push(Instruction::Comment(category.name.clone()));
                    out.push(Instruction::Run(
                        profile.render(PackageOp::Install, &category.packages),
                    ));
                }
            }
            InstallMode::Batched => {
                let all: Vec<&str> = packages.packages().collect();
                out.push(Instruction::Run(profile.render(PackageOp::Install, &all)));
            }
        }
        if let Some(clean) = profile.clean_command() {
            out.push(Instruction::Run(clean.to_string()));
        }
    }

    if !plan.files.is_empty() {
        out.push(Instruction::Blank);
        out.extend(plan.files.iter().map(|f| Instruction::Copy {
            source: f.source.clone(),
            destination: f.destination.clone(),
        }));
    }

    if !plan.enable_units.is_empty() || !plan.disable_units.is_empty() {
        out.push(Instruction::Blank);
        if !plan.enable_units.is_empty() {
            out.push(Instruction::Run(format!(
                "systemctl enable {}",
                join_quoted(&plan.enable_units)
            )));
        }
        if !plan.disable_units.is_empty() {
            out.push(Instruction::Run(format!(
                "systemctl disable {}",
                join_quoted(&plan.disable_units)
            )));
        }
    }

    if !plan.scripts.is_empty() {
        out.push(Instruction::Blank);
        out.extend(plan.scripts.iter().map(|cmd| Instruction::Run(cmd.clone())));
    }

    if plan.image.lint {
        out.push(Instruction::Blank);
        out.push(Instruction::Run(LINT_COMMAND.to_string()));
    }

    out
}

/// Render a plan as Containerfile text
pub fn generate(plan: &ResolutionPlan) -> String {
    let instructions = generate_instructions(plan);
    debug!("Rendering {} Containerfile instructions", instructions.len());

    let mut text = String::new();
    for instruction in &instructions {
        text.push_str(&instruction.to_string());
        text.push('\n');
    }
    text
}

/// Write generated text via a sibling temp file, so a failure never leaves
/// a partially written Containerfile behind.
pub fn write_containerfile(path: &Path, content: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| BootcraftError::parse(path, "output path has no file name"))?;
    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(file_name);
    tmp_name.push(".tmp");
    let tmp_path: PathBuf = path.with_file_name(tmp_name);

    fs::write(&tmp_path, content).map_err(|e| BootcraftError::io(&tmp_path, e))?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(BootcraftError::io(path, e));
    }

    info!("Wrote {} ({} bytes)", path.display(), content.len());
    Ok(())
}
