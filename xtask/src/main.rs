use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::process::{Command, Stdio};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "x")]
#[command(about = "Development automation for hypseus-video")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format check, clippy, build and the full test suite
    Ci {
        #[arg(long)]
        verbose: bool,
    },
    /// Format code
    Fmt {
        #[arg(long)]
        check: bool,
    },
    /// Run clippy with warnings denied
    Clippy {
        #[arg(long)]
        fix: bool,
    },
    /// Run tests, optionally one group at a time
    Test {
        #[arg(long)]
        ignored: bool,
        /// Run only video compositor tests
        #[arg(long)]
        video: bool,
        /// Run only display and window tests
        #[arg(long)]
        display: bool,
        /// Run only renderer tests
        #[arg(long)]
        render: bool,
        /// Run only the headless integration tests
        #[arg(long)]
        integration: bool,
    },
    /// Run the overlay and YUV benchmarks
    Bench,
    /// Run the colour-bar demo
    Demo {
        /// Log filter passed as RUST_LOG
        #[arg(long, default_value = "info")]
        log: String,
        #[arg(long)]
        release: bool,
    },
}

/// Test group: flag name, cargo target args, name filter
struct TestGroup {
    name: &'static str,
    target: &'static [&'static str],
    filter: Option<&'static str>,
}

const TEST_GROUPS: [TestGroup; 4] = [
    TestGroup {
        name: "video",
        target: &["--lib"],
        filter: Some("video::"),
    },
    TestGroup {
        name: "display",
        target: &["--lib"],
        filter: Some("display::"),
    },
    TestGroup {
        name: "render",
        target: &["--lib"],
        filter: Some("render::"),
    },
    TestGroup {
        name: "integration",
        target: &["--test", "compositor_tests"],
        filter: None,
    },
];

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci { verbose } => run_ci(verbose),
        Commands::Fmt { check } => cargo(fmt_args(check)),
        Commands::Clippy { fix } => cargo(clippy_args(fix)),
        Commands::Test {
            ignored,
            video,
            display,
            render,
            integration,
        } => run_test(ignored, [video, display, render, integration]),
        Commands::Bench => cargo(vec!["bench"]),
        Commands::Demo { log, release } => run_demo(&log, release),
    }
}

fn fmt_args(check: bool) -> Vec<&'static str> {
    let mut args = vec!["fmt", "--all"];
    if check {
        args.extend(["--", "--check"]);
    }
    args
}

fn clippy_args(fix: bool) -> Vec<&'static str> {
    let mut args = vec!["clippy", "--workspace", "--all-targets"];
    if fix {
        args.push("--fix");
    } else {
        args.extend(["--", "-D", "warnings"]);
    }
    args
}

fn run_ci(verbose: bool) -> Result<()> {
    println!("{}", "=== hypseus-video CI ===".bold().blue());
    let start = Instant::now();

    let steps: [(&str, Vec<&str>); 4] = [
        ("Format Check", fmt_args(true)),
        ("Clippy", clippy_args(false)),
        ("Build", vec!["build", "--workspace"]),
        ("Test", vec!["test", "--workspace"]),
    ];
    for (name, args) in steps {
        print!("{} {} ... ", "→".blue(), name);
        let step_start = Instant::now();
        match cargo(args) {
            Ok(()) if verbose => println!(
                "{} ({:.2}s)",
                "✓".green().bold(),
                step_start.elapsed().as_secs_f64()
            ),
            Ok(()) => println!("{}", "✓".green().bold()),
            Err(e) => {
                println!("{}", "✗".red().bold());
                return Err(e);
            }
        }
    }

    println!(
        "\n{} {}",
        "✓ CI passed in".green().bold(),
        format!("{:.2}s", start.elapsed().as_secs_f64()).bold()
    );
    Ok(())
}

fn run_test(ignored: bool, selected: [bool; 4]) -> Result<()> {
    let trailing: &[&str] = if ignored { &["--", "--ignored"] } else { &[] };

    if !selected.contains(&true) {
        let mut args = vec!["test", "--workspace"];
        args.extend(trailing);
        return cargo(args);
    }

    let mut failed = Vec::new();
    for (group, _) in TEST_GROUPS.iter().zip(selected).filter(|(_, on)| *on) {
        println!("{} Running {} tests...", "→".blue(), group.name.bold());

        let mut args = vec!["test"];
        args.extend(group.target);
        args.extend(group.filter);
        args.extend(trailing);

        match cargo(args) {
            Ok(()) => println!("{} {} tests passed\n", "✓".green(), group.name),
            Err(_) => {
                println!("{} {} tests failed\n", "✗".red(), group.name);
                failed.push(group.name);
            }
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("Failed test groups: {}", failed.join(", "))
    }
}

fn run_demo(log: &str, release: bool) -> Result<()> {
    println!("{}", "=== Colour-bar Demo ===".bold().blue());
    println!(
        "{} Hotkeys: {} fullscreen, {} scanlines, {} screenshot, {} quit",
        "ℹ".blue(),
        "F11".bold(),
        "F10".bold(),
        "F12".bold(),
        "Esc".bold()
    );

    // Screenshots are refused when the directory is missing
    std::fs::create_dir_all("screenshots")?;

    let mut args = vec!["run", "--bin", "hypseus-video"];
    if release {
        args.push("--release");
    }

    let start = Instant::now();
    let mut cmd = Command::new("cargo");
    cmd.args(args).env("RUST_LOG", log);
    execute_command(&mut cmd)?;

    println!(
        "\n{} Demo exited after {}",
        "✓".green().bold(),
        format!("{:.2}s", start.elapsed().as_secs_f64()).bold()
    );
    Ok(())
}

fn cargo(args: Vec<&str>) -> Result<()> {
    execute_command(Command::new("cargo").args(args))
}

fn execute_command(cmd: &mut Command) -> Result<()> {
    let status = cmd
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;

    if !status.success() {
        anyhow::bail!("Command failed with exit code: {}", status);
    }

    Ok(())
}
