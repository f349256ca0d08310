//! volplan - disk image layout planner
//!
//! Computes a partition and LVM thin-volume layout for a whole-disk VM
//! image and renders it as a declarative config document for the image
//! assembly tool.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod disk;
mod render;
mod utils;

use crate::config::PlanRequest;
use crate::disk::layout::{self, ComputedLayout};
use crate::disk::size::parse_size;
use crate::disk::volumes::{resolve_bindings, VolumeBinding};
use crate::render::document::LayoutDocument;
use crate::utils::report::TracingReporter;

#[derive(Parser)]
#[command(name = "volplan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Input lists shared by the plan and show-layout commands.
#[derive(Args, Clone, Default)]
struct RequestArgs {
    /// Path to a TOML request file; flags below override its fields
    #[arg(short, long, env = "VOLPLAN_CONFIG")]
    config: Option<String>,

    /// Total disk size, e.g. "10GiB"
    #[arg(long)]
    disk_size: Option<String>,

    /// Colon-separated name=size_mib volume list (empty size = fill remaining)
    #[arg(long)]
    volumes: Option<String>,

    /// Colon-separated name=filesystem list
    #[arg(long)]
    filesystems: Option<String>,

    /// Colon-separated name=mount_point list
    #[arg(long)]
    mounts: Option<String>,

    /// Colon-separated name=options list
    #[arg(long)]
    mount_options: Option<String>,

    /// LVM volume group name
    #[arg(long)]
    volume_group: Option<String>,

    /// Thin pool name
    #[arg(long)]
    thin_pool: Option<String>,
}

impl RequestArgs {
    fn into_request(self) -> Result<PlanRequest> {
        let mut request = match self.config {
            Some(ref path) => PlanRequest::from_file(path)?,
            None => PlanRequest::default(),
        };
        if let Some(disk_size) = self.disk_size {
            request.disk_size = disk_size;
        }
        if let Some(volumes) = self.volumes {
            request.volumes = volumes;
        }
        if let Some(filesystems) = self.filesystems {
            request.filesystems = filesystems;
        }
        if let Some(mounts) = self.mounts {
            request.mounts = mounts;
        }
        if let Some(mount_options) = self.mount_options {
            request.mount_options = mount_options;
        }
        if let Some(volume_group) = self.volume_group {
            request.volume_group = volume_group;
        }
        if let Some(thin_pool) = self.thin_pool {
            request.thin_pool = thin_pool;
        }
        Ok(request)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the layout and emit the config document
    Plan {
        #[command(flatten)]
        request: RequestArgs,

        /// Write the document to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Wrap the document in `export <VAR>='...'`
        #[arg(long, value_name = "VAR")]
        export: Option<String>,
    },

    /// Print a human-readable layout summary
    ShowLayout {
        #[command(flatten)]
        request: RequestArgs,
    },

    /// Validate a request file
    Validate {
        /// Path to request file
        config: String,
    },

    /// Generate a sample request file
    GenerateConfig {
        /// Output path for request file
        #[arg(short, long, default_value = "volplan.toml")]
        output: String,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr; stdout carries the rendered document.
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Plan {
            request,
            output,
            export,
        }) => {
            cmd_plan(request, output, export)?;
        }
        Some(Commands::ShowLayout { request }) => {
            cmd_show_layout(request)?;
        }
        Some(Commands::Validate { config }) => {
            cmd_validate(&config)?;
        }
        Some(Commands::GenerateConfig { output }) => {
            cmd_generate_config(&output)?;
        }
        None => {
            // Default: plan with built-in defaults
            cmd_plan(RequestArgs::default(), None, None)?;
        }
    }

    Ok(())
}

/// Run the full computation for a request.
fn compute(request: &PlanRequest) -> Result<(ComputedLayout, Vec<VolumeBinding>)> {
    let disk_mib = parse_size(&request.disk_size)?;
    let volumes = request.volume_spec()?;
    let layout = layout::compute_layout(disk_mib, &volumes)?;
    let bindings = resolve_bindings(
        &volumes,
        &request.filesystem_map()?,
        &request.mount_map()?,
        &request.mount_option_map()?,
        &TracingReporter,
    )?;
    Ok((layout, bindings))
}

fn cmd_plan(args: RequestArgs, output: Option<String>, export: Option<String>) -> Result<()> {
    let request = args.into_request()?;
    let (layout, bindings) = compute(&request)?;

    let document = LayoutDocument::new(&layout, &bindings, &request.volume_group, &request.thin_pool);
    let mut rendered = document.to_json()?;
    rendered.push('\n');

    if let Some(var) = export {
        rendered = render::shell::wrap_export(&var, rendered.trim_end());
    }

    match output {
        Some(path) => {
            std::fs::write(&path, rendered)?;
            println!("{} Layout written to {}", "✓".green(), path);
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

fn cmd_show_layout(args: RequestArgs) -> Result<()> {
    let request = args.into_request()?;
    let (layout, bindings) = compute(&request)?;

    println!(
        "\n{} (total: {} MiB, pool: {} MiB)",
        "Disk layout".bold(),
        layout.total_mib,
        layout.pool_mib
    );
    println!("{:<6} {:<12} {:>10} {:<20}", "NUM", "NAME", "SIZE", "MOUNT");
    println!("{}", "-".repeat(50));
    for partition in &layout.partitions {
        println!(
            "{:<6} {:<12} {:>6} MiB {:<20}",
            partition.number,
            partition.name,
            partition.size_mib,
            partition.mount_point.as_deref().unwrap_or("-")
        );
    }

    println!(
        "\n{} ({}/{})",
        "Logical volumes".bold(),
        request.volume_group,
        request.thin_pool
    );
    println!("{:<12} {:>10} {:<12} {:<20}", "NAME", "SIZE", "FS", "MOUNT");
    println!("{}", "-".repeat(56));
    for volume in &layout.logical_volumes {
        let binding = bindings.iter().find(|b| b.volume == volume.name);
        println!(
            "{:<12} {:>6} MiB {:<12} {:<20}",
            volume.name,
            volume.size_mib,
            binding.map(|b| b.filesystem.as_str()).unwrap_or("-"),
            binding.map(|b| b.mount_point.as_str()).unwrap_or("-")
        );
    }
    println!();

    Ok(())
}

fn cmd_validate(config_path: &str) -> Result<()> {
    let request = PlanRequest::from_file(config_path)?;
    request.validate()?;
    // Run the full computation so sizing errors surface too
    compute(&request)?;
    println!("{} Request is valid", "✓".green());
    Ok(())
}

fn cmd_generate_config(output: &str) -> Result<()> {
    let sample = PlanRequest::sample();
    let content = toml::to_string_pretty(&sample)?;
    std::fs::write(output, content)?;
    println!("{} Sample request written to {}", "✓".green(), output);
    Ok(())
}
