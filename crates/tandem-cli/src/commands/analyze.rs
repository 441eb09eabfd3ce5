//! Portfolio report commands (analyze, conflicts)

use std::path::Path;

use anyhow::Result;
use tandem_core::models::GoalStatus;
use tandem_core::portfolio::{ConflictSeverity, TimelineConflict};
use tandem_core::PortfolioAnalysis;

use super::{money, run_analysis, truncate};
use crate::cli::PortfolioArgs;

pub async fn cmd_analyze(config_path: Option<&Path>, args: &PortfolioArgs) -> Result<()> {
    let analysis = run_analysis(config_path, args).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    print_report(&analysis);
    Ok(())
}

pub async fn cmd_conflicts(config_path: Option<&Path>, args: &PortfolioArgs) -> Result<()> {
    let analysis = run_analysis(config_path, args).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis.conflicts)?);
        return Ok(());
    }

    if analysis.is_empty {
        print_empty();
        return Ok(());
    }

    print_conflicts(&analysis);
    Ok(())
}

fn print_empty() {
    println!("No goals with a target amount. Add goals with:");
    println!("  [{{\"id\": \"trip\", \"title\": \"Trip\", \"target_amount\": 3000, \"target_date\": \"2027-06-01\"}}]");
}

fn print_report(analysis: &PortfolioAnalysis) {
    if analysis.is_empty {
        print_empty();
        return;
    }

    let totals = &analysis.totals;

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│         🎯 Tandem Portfolio             │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  Health score:    {}/100  {}",
        analysis.health_score,
        health_label(analysis.health_score)
    );
    println!(
        "     progress {:.0} · feasibility {:.0} · time buffer {:.0} · distribution {:.0}",
        analysis.health.progress,
        analysis.health.feasibility,
        analysis.health.time_buffer,
        analysis.health.distribution
    );
    println!();
    println!("  Goals:           {}", totals.goal_count);
    println!("  Budget needed:   {}", money(totals.total_budget_needed));
    println!(
        "  Saved:           {} ({:.1}%)",
        money(totals.total_saved),
        totals.percentage_saved
    );
    println!("  Remaining:       {}", money(totals.total_remaining));
    println!();
    println!(
        "  Monthly needed:  {} vs capacity {}",
        money(totals.monthly_required),
        money(analysis.capacity)
    );
    if totals.is_realistic {
        println!("  ✅ The plan fits your monthly savings");
    } else {
        println!(
            "  ⚠️  Short by {}/month",
            money(totals.monthly_gap.max(0.0))
        );
    }

    println!();
    println!("📋 Goals");
    println!("   ─────────────────────────────────────────────────────────────");
    for goal in &analysis.goals {
        let deadline = goal
            .target_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "no deadline".to_string());
        println!(
            "   {} {:<28} {:>10} / {:<10} {:>5.1}%  {:<11} {}",
            status_icon(goal.status),
            truncate(&goal.title, 28),
            money(goal.total_saved),
            money(goal.target_amount),
            goal.percentage_saved,
            deadline,
            goal.priority
        );
        if goal.monthly_required > 0.0 {
            println!(
                "      {}/month · {}",
                money(goal.monthly_required),
                goal.status
            );
        }
    }

    if !analysis.recommendations.is_empty() {
        println!();
        println!("💡 Recommendations");
        println!("   ─────────────────────────────────────────────────────────────");
        for rec in &analysis.recommendations {
            println!(
                "   • {} (impact: {}, difficulty: {})",
                rec.title, rec.impact, rec.difficulty
            );
            println!("     {}", rec.description);
        }
    }

    if !analysis.conflicts.is_empty() {
        print_conflicts(analysis);
    } else {
        println!();
    }
}

fn print_conflicts(analysis: &PortfolioAnalysis) {
    println!();
    println!(
        "📅 Timeline ({} funding)",
        analysis.funding_model.as_str().replace('_', " ")
    );
    println!("   ─────────────────────────────────────────────────────────────");

    if analysis.conflicts.is_empty() {
        println!("   ✅ No crowded months");
        println!();
        return;
    }

    for conflict in &analysis.conflicts {
        print_conflict(conflict);
    }

    let strict = analysis.strict_conflicts().count();
    if strict > 0 {
        println!(
            "   {} month{} short by {} in total",
            strict,
            if strict == 1 { "" } else { "s" },
            money(analysis.conflict_shortage())
        );
    }
    println!();
}

fn print_conflict(conflict: &TimelineConflict) {
    println!(
        "   {} {}  needs {} of {} available ({:.0}%)",
        severity_icon(conflict.severity),
        conflict.key,
        money(conflict.total_needed),
        money(conflict.available_cash),
        conflict.percentage_used
    );
    for goal in &conflict.goals {
        println!(
            "      - {} ({}, {})",
            truncate(&goal.title, 40),
            money(goal.remaining),
            goal.priority
        );
    }
    for suggestion in &conflict.suggestions {
        println!("      → {}", suggestion.description);
    }
}

fn health_label(score: u8) -> &'static str {
    match score {
        80..=100 => "💚 strong",
        60..=79 => "💛 fair",
        40..=59 => "🧡 strained",
        _ => "❤️  at risk",
    }
}

fn status_icon(status: GoalStatus) -> &'static str {
    match status {
        GoalStatus::Complete => "✅",
        GoalStatus::NoDeadline => "⏸️ ",
        GoalStatus::OnTrack => "🟢",
        GoalStatus::Achievable => "🟡",
        GoalStatus::Challenging => "🟠",
        GoalStatus::Unrealistic => "🔴",
    }
}

fn severity_icon(severity: ConflictSeverity) -> &'static str {
    match severity {
        ConflictSeverity::Safe => "🟢",
        ConflictSeverity::Moderate => "🟡",
        ConflictSeverity::High => "🟠",
        ConflictSeverity::Critical => "🔴",
    }
}
