//! # SignCalc CLI
//!
//! Runs one sign design request through the pipeline and prints a summary
//! followed by the result JSON.
//!
//! ```text
//! signcalc request.json --config signcalc.toml
//! signcalc --json                        # built-in demo request
//! ```
//!
//! Exit codes: 0 complete, 1 abstained, 2 error.

mod cli;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use signcalc_core::pipeline::{DesignStatus, SignDesignResult};
use signcalc_core::{CalcError, CalcResult, EngineConfig, SignDesignRequest, SignDesigner};

const DEMO_REQUEST: &str = r#"{
  "jurisdiction": "US",
  "standard": {"code": "ASCE7", "version": "7-16", "importance": "II"},
  "site": {"exposure": "C", "soil": "clay", "basic_wind_speed": 115},
  "sign": {"width_ft": 10, "height_ft": 6, "centroid_height_ft": 15, "gross_weight_lbf": 450},
  "supports": ["pipe", "W"],
  "embed": {"type": "direct"}
}"#;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(result) => {
            if cli.json {
                print_json(&result);
            } else {
                print_report(&result);
            }
            match result.status {
                DesignStatus::Complete => ExitCode::SUCCESS,
                DesignStatus::Abstained => ExitCode::from(1),
            }
        }
        Err(e) => {
            tracing::error!(code = e.error_code(), "design failed");
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> CalcResult<SignDesignResult> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    }
    .with_env()
    .with_packs_dir_override(cli.packs_dir.clone());

    let designer = SignDesigner::from_config(&config)?;
    let request = read_request(cli.request.as_deref())?;
    designer.design(&request)
}

fn read_request(path: Option<&Path>) -> CalcResult<SignDesignRequest> {
    let (origin, text) = match path {
        Some(path) => {
            let origin = path.display().to_string();
            let text = std::fs::read_to_string(path).map_err(|e| {
                CalcError::invalid_input("request", &origin, format!("Failed to read: {}", e))
            })?;
            (origin, text)
        }
        None => ("built-in demo".to_string(), DEMO_REQUEST.to_string()),
    };
    serde_json::from_str(&text)
        .map_err(|e| CalcError::invalid_input("request", &origin, format!("Invalid JSON: {}", e)))
}

fn print_json(result: &SignDesignResult) {
    if let Ok(json) = serde_json::to_string_pretty(result) {
        println!("{}", json);
    }
}

fn print_report(result: &SignDesignResult) {
    println!("═══════════════════════════════════════");
    println!("  SIGN DESIGN RESULTS");
    println!("═══════════════════════════════════════");
    println!("  Run:  {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    if let Some(pack) = &result.trace.standards_pack {
        println!("  Pack: {}", pack);
    }
    println!();

    if let Some(loads) = &result.loads {
        println!("Wind:");
        println!("  Pressure = {:.2} psf", loads.pressure_psf);
        println!("  F        = {:.0} lbf", loads.force_lbf);
        println!("  M        = {:.0} ft-lb (arm {:.1} ft)", loads.moment_ftlb, loads.arm_ft);
        println!();
    }

    if let Some(member) = &result.member {
        println!("Member: {} ({} ksi)", member.section.designation, member.fy_psi / 1000.0);
        println!("  Bending:     {:.2} {}", member.ratios.bending, status_icon(member.ratios.bending <= 1.0));
        println!("  Shear:       {:.2} {}", member.ratios.shear, status_icon(member.ratios.shear <= 1.0));
        println!(
            "  Deflection:  {:.2} ({:.2}\" vs {:.2}\") {}",
            member.ratios.deflection,
            member.deflection_in,
            member.allowable_deflection_in,
            status_icon(member.ratios.deflection <= 1.0)
        );
        println!(
            "  Interaction: {:.2} {}",
            member.ratios.interaction,
            status_icon(member.ratios.interaction <= 1.0)
        );
        println!();
    }

    if let Some(foundation) = &result.foundation {
        println!(
            "Foundation: {:.0}\" dia x {:.0}\" deep ({:.2} yd³)",
            foundation.diameter_in, foundation.depth_in, foundation.concrete_volume_yd3
        );
        for (mode, sf) in foundation.safety_factors.entries() {
            println!(
                "  {:<12} SF = {:.2} {}",
                mode.to_string(),
                sf,
                status_icon(sf >= foundation.min_safety_factor)
            );
        }
        if let Some(anchors) = &foundation.anchors {
            println!(
                "  Anchors:     {} (T {:.2}, V {:.2}) {}",
                anchors.schedule_ref,
                anchors.tension_ratio,
                anchors.shear_ratio,
                status_icon(anchors.passes())
            );
        }
        println!();
    }

    if let Some(rebar) = &result.rebar {
        println!("Rebar: {} ({})", rebar.callout(), rebar.schedule_ref);
        println!();
    }

    for reason in &result.abstain_reasons {
        println!("Abstained [{}] {}: {}", reason.component, reason.code, reason.message);
    }
    if !result.abstain_reasons.is_empty() {
        println!();
    }

    println!("═══════════════════════════════════════");
    println!(
        "  RESULT: {} (confidence {:.3})",
        match result.status {
            DesignStatus::Complete => "COMPLETE",
            DesignStatus::Abstained => "ABSTAINED",
        },
        result.confidence
    );
    println!("═══════════════════════════════════════");

    println!();
    println!("JSON Output (for LLM/API use):");
    print_json(result);
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}
