use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use rk_core::units::k;
use rk_kinetics::{DecayHeatData, FissionIsotope, PrecursorData, Spectrum};
use rk_project::{ModelDef, ProjectResult, compile};
use rk_sim::{IntegratorType, ReactorTrace, SimError, SimProgress, run_sim_with_progress};

#[derive(Parser)]
#[command(name = "reactorkin")]
#[command(about = "reactorkin - point kinetics coupled to a lumped thermal network", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a model file
    Validate {
        /// Path to the model YAML/JSON file
        model_path: PathBuf,
    },
    /// Run a transient and print or export the histories
    Run {
        /// Path to the model YAML/JSON file
        model_path: PathBuf,
        /// Override the end time in seconds
        #[arg(long)]
        tf: Option<f64>,
        /// Override the output interval in seconds
        #[arg(long)]
        dt: Option<f64>,
        /// Override the integrator (dopri5, rk4, euler)
        #[arg(long)]
        method: Option<String>,
        /// Print every N-th output point
        #[arg(long, default_value_t = 1)]
        every: usize,
        /// Write the full trace as CSV instead of printing a table
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List built-in materials
    Materials,
    /// Print delayed-neutron and decay-heat data
    Data {
        /// Fissioning isotope (u235, pu239)
        isotope: String,
        /// Neutron spectrum (thermal, fast)
        spectrum: String,
    },
}

fn main() -> ProjectResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { model_path } => cmd_validate(&model_path),
        Commands::Run {
            model_path,
            tf,
            dt,
            method,
            every,
            output,
        } => cmd_run(&model_path, tf, dt, method, every, output.as_deref()),
        Commands::Materials => {
            cmd_materials();
            Ok(())
        }
        Commands::Data { isotope, spectrum } => cmd_data(&isotope, &spectrum),
    }
}

fn cmd_validate(model_path: &Path) -> ProjectResult<()> {
    println!("Validating model: {}", model_path.display());
    let def = rk_project::load(model_path)?;
    let compiled = compile(&def)?;
    let registry = compiled.model.registry();
    println!("✓ Model is valid");
    println!(
        "  {} - {} components, {} links, {} outputs",
        def.name,
        registry.len(),
        registry.link_count(),
        compiled.options.timer.timesteps()
    );
    Ok(())
}

fn apply_overrides(
    def: &mut ModelDef,
    tf: Option<f64>,
    dt: Option<f64>,
    method: Option<String>,
) -> ProjectResult<()> {
    if let Some(tf) = tf {
        def.timer.tf = format!("{tf} s");
    }
    if let Some(dt) = dt {
        def.timer.dt = format!("{dt} s");
    }
    if let Some(method) = method {
        let ty: IntegratorType = method.parse()?;
        def.integrator.method = ty.as_str().to_string();
    }
    Ok(())
}

fn cmd_run(
    model_path: &Path,
    tf: Option<f64>,
    dt: Option<f64>,
    method: Option<String>,
    every: usize,
    output: Option<&Path>,
) -> ProjectResult<()> {
    tracing::debug!(path = %model_path.display(), "loading model");
    let mut def = rk_project::load(model_path)?;
    apply_overrides(&mut def, tf, dt, method)?;
    let compiled = compile(&def)?;
    if every == 0 {
        return Err(SimError::InvalidArg {
            what: "--every must be positive",
        }
        .into());
    }

    println!("Running transient: {}", def.name);
    let started = Instant::now();
    let mut last_emit = Instant::now();
    let record = run_sim_with_progress(&compiled.model, &compiled.options, |p| {
        if last_emit.elapsed().as_millis() >= 100 || p.fraction_complete >= 1.0 {
            render_progress(p, started);
            last_emit = Instant::now();
        }
    })?;
    clear_progress_line();

    let trace = ReactorTrace::from_record(&compiled.model, &record)?;
    println!(
        "✓ Simulation completed in {:.2}s ({} accepted, {} rejected steps)",
        started.elapsed().as_secs_f64(),
        trace.stats().accepted,
        trace.stats().rejected
    );

    match output {
        Some(path) => {
            std::fs::write(path, trace_csv(&trace))?;
            println!("✓ Wrote {} rows to {}", trace.len(), path.display());
        }
        None => print_table(&trace, every),
    }
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_progress(p: &SimProgress, started: Instant) {
    let width = 28usize;
    let filled = ((p.fraction_complete * width as f64).round() as usize).min(width);
    let bar = format!(
        "{}{}",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled))
    );
    print!(
        "\r[{}] {:>6.2}%  t={:.3}/{:.3}s  steps={}  rejected={}  elapsed={:.1}s",
        bar,
        p.fraction_complete * 100.0,
        p.t,
        p.tf,
        p.steps.accepted,
        p.steps.rejected,
        started.elapsed().as_secs_f64()
    );
    let _ = io::stdout().flush();
}

fn print_table(trace: &ReactorTrace, every: usize) {
    let names = trace.component_names();
    print!("{:>10} {:>14} {:>12} {:>12}", "t [s]", "power [W]", "n", "rho [pcm]");
    for name in names {
        print!(" {:>12}", format!("{name} [K]"));
    }
    println!();

    let last = trace.len().saturating_sub(1);
    for i in (0..trace.len()).filter(|i| i % every == 0 || *i == last) {
        print!(
            "{:>10.4} {:>14.6e} {:>12.6} {:>12.3}",
            trace.times()[i],
            trace.power()[i],
            trace.neutron_population()[i],
            trace.reactivity()[i] * 1e5
        );
        for name in names {
            let temps = trace.temperature(name).unwrap_or_default();
            print!(" {:>12.3}", temps.get(i).copied().unwrap_or(f64::NAN));
        }
        println!();
    }
}

fn trace_csv(trace: &ReactorTrace) -> String {
    let names = trace.component_names();
    let mut out = String::from("t_s,power_w,power_fraction,neutron_population,reactivity");
    for name in names {
        out.push_str(&format!(",{name}_k"));
    }
    out.push('\n');
    for i in 0..trace.len() {
        out.push_str(&format!(
            "{},{},{},{},{}",
            trace.times()[i],
            trace.power()[i],
            trace.power_fraction()[i],
            trace.neutron_population()[i],
            trace.reactivity()[i]
        ));
        for name in names {
            let temps = trace.temperature(name).unwrap_or_default();
            out.push_str(&format!(",{}", temps.get(i).copied().unwrap_or(f64::NAN)));
        }
        out.push('\n');
    }
    out
}

fn cmd_materials() {
    println!("Built-in materials (properties at 900 K):");
    for entry in rk_materials::catalog() {
        let mat = entry.build();
        let t = k(900.0);
        println!(
            "  {:<10} {:<22} rho={:>8.1} kg/m^3  cp={:>7.1} J/(kg*K)  k={:>6.2} W/(m*K)  aliases: {}",
            entry.canonical_id,
            entry.display_name,
            mat.density(t).value,
            mat.specific_heat(t).value,
            mat.conductivity(t).value,
            entry.aliases.join(", ")
        );
    }
}

fn cmd_data(isotope: &str, spectrum: &str) -> ProjectResult<()> {
    let isotope: FissionIsotope = isotope.parse().map_err(SimError::from)?;
    let spectrum: Spectrum = spectrum.parse().map_err(SimError::from)?;
    let precursors = PrecursorData::lookup(isotope, spectrum, rk_kinetics::PRECURSOR_GROUPS as i64)
        .map_err(SimError::from)?;

    println!("{isotope} / {spectrum}");
    println!(
        "  beta = {:.6}  Lambda = {:.1e} s",
        precursors.beta(),
        precursors.generation_time()
    );
    println!("  {:>5} {:>12} {:>12}", "group", "beta_i", "lambda_i [1/s]");
    for (i, (b, l)) in precursors.betas().iter().zip(precursors.lambdas()).enumerate() {
        println!("  {:>5} {:>12.6e} {:>12.5}", i + 1, b, l);
    }

    match DecayHeatData::lookup(isotope, spectrum, rk_kinetics::DECAY_HEAT_GROUPS as i64) {
        Ok(decay) => {
            println!("  decay heat: sum kappa = {:.5}", decay.kappa_total());
            println!("  {:>5} {:>12} {:>12}", "group", "kappa_k", "lambda_k [1/s]");
            for (i, (kappa, l)) in decay.kappas().iter().zip(decay.lambdas()).enumerate() {
                println!("  {:>5} {:>12.6e} {:>12.5e}", i + 1, kappa, l);
            }
        }
        Err(e) => println!("  decay heat: {e}"),
    }
    Ok(())
}
