//! Valuater: Sale Price Correlation Study CLI
//!
//! Loads a housing dataset and writes correlation heatmaps, top-feature bar
//! charts, feature-vs-target views and a predictive power score heatmap into
//! an output directory.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;

use valuater::cli::{confirm_section, select_target, Cli, Section};
use valuater::pipeline::{
    compute_correlation, compute_if_requested, compute_if_requested_timed,
    compute_relevance_matrix_with, load_dataset_columns, top_k_by_absolute_correlation, top_k_predictors, CorrelationMethod, Dataset, RankedFeature,
};
use valuater::render::{
    render_feature_vs_target, render_masked_heatmap, render_top_bar_chart, DisplaySurface,
    HeatmapLayout, TextBlock,
};
use valuater::report::{
    export_analysis, package_artifacts, print_ranking, sample_table, AnalysisExport,
    AnalysisSummary, CorrelationSection, DirectorySurface, ExportParams, RelevanceSection,
};
use valuater::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_count, print_info, print_step_header, print_step_time, print_success,
    print_warning,
};

/// Rows shown by the data sample section
const SAMPLE_ROWS: usize = 10;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let output_dir = cli.output_dir();

    // Print styled banner
    print_banner(env!("CARGO_PKG_VERSION"));

    // Print configuration card
    print_config(
        &cli.input,
        &cli.target,
        &output_dir,
        cli.correlation_threshold,
        cli.relevance_threshold,
    );

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let spinner = create_spinner("Loading dataset...");
    let loaded = load_dataset_columns(&cli.input, cli.infer_schema_length, &cli.columns_to_load());
    match &loaded {
        Ok(_) => finish_with_success(&spinner, "Dataset loaded"),
        Err(_) => finish_with_warning(&spinner, "Failed to load dataset"),
    }
    let (dataset, memory_mb) = loaded?;

    let (rows, cols) = dataset.shape();
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", memory_mb);

    let mut summary = AnalysisSummary::new(rows, cols);
    let load_elapsed = step_start.elapsed();
    summary.add_section("Load Dataset", load_elapsed);
    print_step_time(load_elapsed);

    let target = resolve_target(&cli, &dataset)?;

    // Step 2: Choose sections
    print_step_header(2, "Select Sections");
    let mut plan = Vec::new();
    for section in Section::ALL {
        let run = cli.section_flagged(section) || (!cli.no_confirm && confirm_section(section)?);
        if run {
            plan.push(section);
        } else {
            summary.skip_section(section.title());
        }
    }
    print_count("section(s) selected", plan.len(), None);
    let wants = |section: Section| plan.contains(&section);

    let features = cli.features_to_study();
    let mut surface = DirectorySurface::create(&output_dir, false)?;
    surface.show_text(TextBlock::plain("### Sale Price Correlation Study"))?;
    surface.show_text(TextBlock::info(format!(
        "Target: {}\nFeatures studied: {}",
        target,
        features.join(", ")
    )))?;

    let mut export = AnalysisExport::new(&ExportParams {
        input_file: &cli.input.display().to_string(),
        target_column: &target,
        rows,
        columns: cols,
        correlation_threshold: cli.correlation_threshold,
        relevance_threshold: cli.relevance_threshold,
        top_k: cli.top_k,
        features_studied: &features,
    });

    let mut step: u8 = 3;

    // Data sample
    let sample = compute_if_requested_timed(wants(Section::Sample), || {
        sample_table(&dataset, SAMPLE_ROWS)
    });
    if let Some((table, compute_elapsed)) = sample {
        print_step_header(step, Section::Sample.title());
        step += 1;
        let step_start = Instant::now();
        for line in table.to_string().lines() {
            println!("      {}", line);
        }
        surface.show_text(TextBlock::info(format!(
            "The dataset has {} rows and {} columns",
            rows, cols
        )))?;
        summary.add_section(Section::Sample.title(), compute_elapsed + step_start.elapsed());
    }

    // Correlation studies
    for (section, method) in [
        (Section::Pearson, CorrelationMethod::Pearson),
        (Section::Spearman, CorrelationMethod::Spearman),
    ] {
        let result = compute_if_requested(wants(section), || {
            print_step_header(step, section.title());
            run_correlation(&dataset, &target, method, &cli, &mut surface, &mut summary)
        });
        let Some(result) = result else { continue };
        step += 1;
        match method {
            CorrelationMethod::Pearson => export.pearson = result?,
            CorrelationMethod::Spearman => export.spearman = result?,
        }
    }

    // Feature vs target views
    if wants(Section::Scatter) {
        print_step_header(step, Section::Scatter.title());
        step += 1;
        let step_start = Instant::now();

        let missing: Vec<&str> = features
            .iter()
            .map(String::as_str)
            .filter(|f| !dataset.contains(f))
            .collect();
        if !missing.is_empty() {
            print_warning(&format!("Features not in dataset: {}", missing.join(", ")));
        }
        if let Some(group) = cli.group_column() {
            if !dataset.contains(group) {
                print_warning(&format!(
                    "Group column '{}' not found, scatter plots are uncoloured",
                    group
                ));
            }
        }

        let before = surface.written().len();
        for feature in &features {
            render_feature_vs_target(&dataset, feature, &target, cli.group_column(), &mut surface)?;
        }
        print_count(
            "feature view(s) written",
            surface.written().len() - before,
            None,
        );

        let elapsed = step_start.elapsed();
        summary.add_section(Section::Scatter.title(), elapsed);
        print_step_time(elapsed);
    }

    // Predictive power score
    let config = cli.relevance_config();
    let relevance = compute_if_requested_timed(wants(Section::Relevance), || {
        print_step_header(step, Section::Relevance.title());
        print_info(&format!(
            "Scoring {} ordered column pairs ({} folds, sample {}, seed {})",
            cols * cols.saturating_sub(1),
            config.folds,
            config.sample,
            config.seed
        ));
        compute_relevance_matrix_with(&dataset, &config)
    });
    if let Some((matrix, compute_elapsed)) = relevance {
        let step_start = Instant::now();
        print_success("Predictive power scores computed");

        let layout = HeatmapLayout::relevance("Predictive Power Score");
        render_masked_heatmap(&matrix, cli.relevance_threshold, &layout, &mut surface)?;

        let ranking = top_k_predictors(&matrix, &target, cli.top_k)?;
        print_ranking(&format!("Top predictors of {}", target), &ranking);
        surface.show_text(TextBlock::info(describe_ranking(
            &format!("Strongest predictors of {}", target),
            &ranking,
        )))?;

        export.relevance = Some(RelevanceSection {
            config,
            ranking,
            matrix,
        });
        let elapsed = compute_elapsed + step_start.elapsed();
        summary.add_section(Section::Relevance.title(), elapsed);
        print_step_time(elapsed);
    }

    summary.figures = surface.written().len();
    print_success(&format!(
        "{} figure(s) written to {}",
        summary.figures,
        surface.dir().display()
    ));

    // JSON report
    if !export.is_empty() {
        let report_path = cli.report_path();
        if let Some(parent) = report_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        export_analysis(&export, &report_path)?;
        print_success(&format!("Analysis report saved to {}", report_path.display()));
    }

    // Optional zip bundle
    if cli.bundle {
        let zip_path = cli.bundle_path();
        let spinner = create_spinner("Bundling artifacts...");
        let count = package_artifacts(surface.dir(), &zip_path)?;
        finish_with_success(
            &spinner,
            &format!("Bundled {} file(s) into {}", count, zip_path.display()),
        );
    }

    summary.display();
    print_completion();

    Ok(())
}

/// Use the configured target, or ask for one when it is missing and prompts are allowed
fn resolve_target(cli: &Cli, dataset: &Dataset) -> Result<String> {
    if dataset.contains(&cli.target) {
        return Ok(cli.target.clone());
    }

    let columns = dataset.column_names();
    if cli.no_confirm {
        anyhow::bail!(
            "Target column '{}' not found in dataset. Available columns: {:?}",
            cli.target,
            columns
        );
    }

    print_warning(&format!("Target column '{}' not found", cli.target));
    select_target(&columns)
}

/// Heatmap, bar chart and ranking for one correlation method.
///
/// An unusable dataset (e.g. a constant target) skips the section with a
/// warning instead of aborting the run.
fn run_correlation(
    dataset: &Dataset,
    target: &str,
    method: CorrelationMethod,
    cli: &Cli,
    surface: &mut DirectorySurface,
    summary: &mut AnalysisSummary,
) -> Result<Option<CorrelationSection>> {
    let title = format!("{} Correlation", method);
    let step_start = Instant::now();
    let spinner = create_spinner(&format!("Computing {} matrix...", title.to_lowercase()));

    let matrix = match compute_correlation(dataset, target, method) {
        Ok(matrix) => {
            finish_with_success(
                &spinner,
                &format!("{} matrix over {} columns", title, matrix.values().len()),
            );
            matrix
        }
        Err(e) => {
            finish_with_warning(&spinner, &format!("{} skipped", title));
            print_warning(&e.to_string());
            summary.skip_section(&title);
            return Ok(None);
        }
    };

    let layout = HeatmapLayout::correlation(format!("{} Heatmap", title));
    render_masked_heatmap(&matrix, cli.correlation_threshold, &layout, surface)?;

    let ranking = top_k_by_absolute_correlation(&matrix, target, cli.top_k)?;
    render_top_bar_chart(
        &ranking,
        cli.top_k,
        &format!("Top {} {} Correlations", cli.top_k, method),
        surface,
    )?;
    print_ranking(&format!("Top {} correlations with {}", method, target), &ranking);
    surface.show_text(TextBlock::info(describe_ranking(
        &format!("Features most {}-correlated with {}", method, target),
        &ranking,
    )))?;

    let elapsed = step_start.elapsed();
    summary.add_section(&title, elapsed);
    print_step_time(elapsed);

    Ok(Some(CorrelationSection { ranking, matrix }))
}

fn describe_ranking(heading: &str, ranking: &[RankedFeature]) -> String {
    let mut lines = vec![format!("{}:", heading)];
    lines.extend(
        ranking
            .iter()
            .map(|f| format!("* {}: {:+.3}", f.feature, f.score)),
    );
    lines.join("\n")
}
