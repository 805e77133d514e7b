//! Fleet summary export formatting.

use medfleet_core::PlanResponse;

const CSV_HEADER: &str =
    "droneId,riskLevel,riskScore,hoursUntilService,missionBuffer,recommendation,contributingFactors\n";

/// Header used when there are no plans; the factors column is omitted.
const CSV_HEADER_EMPTY: &str =
    "droneId,riskLevel,riskScore,hoursUntilService,missionBuffer,recommendation\n";

/// Pretty JSON rendering of a fleet summary.
pub fn export_json(summary: &PlanResponse) -> String {
    serde_json::to_string_pretty(summary).expect("fleet summary serializes")
}

/// CSV rendering of a fleet summary, one row per plan.
pub fn export_csv(summary: &PlanResponse) -> String {
    if summary.plans.is_empty() {
        return CSV_HEADER_EMPTY.to_string();
    }
    let mut csv = String::from(CSV_HEADER);
    for plan in &summary.plans {
        let level = match plan.risk_level {
            medfleet_core::RiskLevel::Low => "LOW",
            medfleet_core::RiskLevel::Medium => "MEDIUM",
            medfleet_core::RiskLevel::High => "HIGH",
        };
        let factors = plan.contributing_factors.join("; ");
        csv.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            escape_csv(&plan.drone_id),
            level,
            plan.risk_score,
            plan.hours_until_service,
            plan.mission_buffer,
            escape_csv(&plan.recommendation),
            escape_csv(&factors),
        ));
    }
    csv
}

fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
