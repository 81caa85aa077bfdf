// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod render;
mod session;
mod tracing_setup;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use leadboard_app::{
    LEAD_FILTERS_KEY, LeadFieldEdit, LeadId, LeadStatus, LeadStore, OpportunityStage, SortKey,
    SortOrder, StatusFilter,
};
use leadboard_console::{Console, RandomFaults, SimulatedBackend, bundled_leads, load_leads_file};
use leadboard_prefs::PrefStore;
use session::{SessionRequest, run_session};
use std::env;
use std::path::PathBuf;
use tracing_setup::Verbosity;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    tracing_setup::init_subscriber(Verbosity::from_flags(options.verbose, options.quiet));

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `leadboard --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let prefs_path = config.prefs_path()?;
    let prefs = PrefStore::open(&prefs_path).with_context(|| {
        format!(
            "open preferences {} -- if this path is wrong, set [storage].prefs_path or LEADBOARD_PREFS_PATH",
            prefs_path.display()
        )
    })?;
    prefs.bootstrap()?;
    if options.reset_filters {
        let removed = prefs.remove(LEAD_FILTERS_KEY)?;
        tracing::info!(removed, "saved filters cleared");
    }

    let dataset = match config.leads_path() {
        Some(path) => load_leads_file(&path)?,
        None => bundled_leads()?,
    };
    let rates = config.fault_rates();
    let faults = RandomFaults::new(rates, config.seed());
    let backend = SimulatedBackend::new(dataset, config.latency()?, Box::new(faults));
    tracing::debug!(
        prefs = %prefs_path.display(),
        leads = backend.dataset().len(),
        load_failure_rate = rates.load,
        update_failure_rate = rates.update,
        create_failure_rate = rates.create,
        "startup complete"
    );
    if options.check_only {
        return Ok(());
    }

    let mut console = Console::new(LeadStore::new(Box::new(prefs)), backend);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("build async runtime")?;
    let notices = runtime.block_on(run_session(&mut console, &options.request))?;

    print!(
        "{}",
        render::render_console(console.leads(), console.opportunities())
    );
    for notice in notices {
        println!("{notice}");
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    reset_filters: bool,
    show_help: bool,
    verbose: bool,
    quiet: bool,
    request: SessionRequest,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        check_only: false,
        reset_filters: false,
        show_help: false,
        verbose: false,
        quiet: false,
        request: SessionRequest::default(),
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let mut value_for = |flag: &str, what: &str| -> Result<String> {
            iter.next()
                .map(|value| value.as_ref().to_owned())
                .ok_or_else(|| anyhow!("{flag} requires {what}"))
        };
        match arg.as_ref() {
            "--config" => {
                options.config_path = PathBuf::from(value_for("--config", "a file path")?);
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--reset-filters" => {
                options.reset_filters = true;
            }
            "--search" => {
                options.request.filters.search = Some(value_for("--search", "text")?);
            }
            "--status" => {
                let raw = value_for("--status", "a status")?;
                let status = StatusFilter::parse(&raw).ok_or_else(|| {
                    anyhow!("unknown status {raw:?}; use all, new, contacted, qualified or unqualified")
                })?;
                options.request.filters.status = Some(status);
            }
            "--sort" => {
                let raw = value_for("--sort", "a column")?;
                let key = SortKey::parse(&raw).ok_or_else(|| {
                    anyhow!("unknown sort column {raw:?}; use score, name or company")
                })?;
                options.request.filters.sort_by = Some(key);
            }
            "--order" => {
                let raw = value_for("--order", "a direction")?;
                let order = SortOrder::parse(&raw)
                    .ok_or_else(|| anyhow!("unknown sort order {raw:?}; use asc or desc"))?;
                options.request.filters.sort_order = Some(order);
            }
            "--page" => {
                let raw = value_for("--page", "a page number")?;
                let page: usize = raw
                    .parse()
                    .with_context(|| format!("invalid page number {raw:?}"))?;
                if page == 0 {
                    bail!("--page starts at 1");
                }
                options.request.page = Some(page);
            }
            "--select" => {
                options.request.select = Some(LeadId::new(value_for("--select", "a lead id")?));
            }
            "--set-email" => {
                let email = value_for("--set-email", "an email address")?;
                options.request.edits.push(LeadFieldEdit::Email(email));
            }
            "--set-status" => {
                let raw = value_for("--set-status", "a status")?;
                let status = LeadStatus::parse(&raw).ok_or_else(|| {
                    anyhow!("unknown lead status {raw:?}; use new, contacted, qualified or unqualified")
                })?;
                options.request.edits.push(LeadFieldEdit::Status(status));
            }
            "--convert" => {
                options.request.convert = true;
            }
            "--set-stage" => {
                let raw = value_for("--set-stage", "a stage")?;
                let stage = OpportunityStage::parse(&raw).ok_or_else(|| {
                    anyhow!(
                        "unknown stage {raw:?}; use prospecting, qualification, proposal, negotiation, closed-won or closed-lost"
                    )
                })?;
                options.request.stage = Some(stage);
            }
            "--verbose" | "-v" => {
                options.verbose = true;
            }
            "--quiet" | "-q" => {
                options.quiet = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                bail!("unknown argument {unknown:?}; run with --help to see supported options");
            }
        }
    }

    let request = &options.request;
    if request.select.is_none() && (!request.edits.is_empty() || request.convert) {
        bail!("--set-email, --set-status and --convert act on a lead; add --select <lead-id>");
    }
    if request.stage.is_some() && !request.convert {
        bail!("--set-stage applies to the converted opportunity; add --convert");
    }

    Ok(options)
}

fn print_help() {
    println!("leadboard");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --check                  Validate config, preferences and lead data");
    println!("  --reset-filters          Forget saved filters before loading");
    println!("  --search <text>          Filter by name or company");
    println!("  --status <status>        all, new, contacted, qualified or unqualified");
    println!("  --sort <column>          score, name or company");
    println!("  --order <direction>      asc or desc");
    println!("  --page <n>               Show page n (100 leads per page)");
    println!("  --select <lead-id>       Open a lead in the detail view");
    println!("  --set-email <email>      Change the selected lead's email");
    println!("  --set-status <status>    Change the selected lead's status");
    println!("  --convert                Convert the selected lead into an opportunity");
    println!("  --set-stage <stage>      Stage for the converted opportunity");
    println!("  -v, --verbose            Debug logging on stderr");
    println!("  -q, --quiet              Only log errors");
    println!("  -h, --help               Show this help");
}
