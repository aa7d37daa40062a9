// ==========================================
// 例会分桌轮换系统 - 评估文本 / 结论 JSON
// ==========================================
// 文本: 每条结论一行，前置轮次与卓番标题，保持生成顺序
// JSON: 结论列表原样序列化
// ==========================================

use crate::domain::finding::{
    EvaluationFinding, FindingCategory, FindingDetail, FindingScope, Severity, VenueHeadcount,
};
use crate::domain::settings::table_label;
use crate::export::error::ExportResult;
use crate::i18n::t_in;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

// ==========================================
// EvaluationReport - 本地化评估文本
// ==========================================
pub struct EvaluationReport {
    locale: String,
}

impl EvaluationReport {
    pub fn new(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
        }
    }

    /// 全部结论的文本行（含标题）
    pub fn render(&self, findings: &[EvaluationFinding]) -> Vec<String> {
        let mut lines = Vec::with_capacity(findings.len() * 2);
        let mut current_rotation: Option<Option<u32>> = None;
        let mut current_table: Option<&str> = None;

        for finding in findings {
            let rotation = finding.rotation();
            if current_rotation != Some(rotation) {
                lines.push(self.rotation_heading(rotation));
                current_rotation = Some(rotation);
                current_table = None;
            }

            match finding.table() {
                Some(table) if current_table != Some(table) => {
                    lines.push(t_in(
                        &self.locale,
                        "report.table_heading",
                        &[("table", table)],
                    ));
                    current_table = Some(table);
                }
                Some(_) => {}
                None => current_table = None,
            }

            lines.push(describe_finding(&self.locale, finding));
        }
        lines
    }

    /// 各轮的违反/警告件数
    pub fn summary(&self, findings: &[EvaluationFinding], rotation_count: u32) -> Vec<String> {
        (1..=rotation_count)
            .map(|rotation| {
                let (mut violations, mut warnings) = (0usize, 0usize);
                for finding in findings.iter().filter(|f| f.rotation() == Some(rotation)) {
                    match finding.severity {
                        Severity::Violation => violations += 1,
                        Severity::Warning => warnings += 1,
                        Severity::Info => {}
                    }
                }
                t_in(
                    &self.locale,
                    "report.rotation_summary",
                    &[
                        ("rotation", &rotation.to_string()),
                        ("violations", &violations.to_string()),
                        ("warnings", &warnings.to_string()),
                    ],
                )
            })
            .collect()
    }

    pub fn write_file<P: AsRef<Path>>(&self, path: P, findings: &[EvaluationFinding]) -> ExportResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        for line in self.render(findings) {
            writeln!(writer, "{}", line)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn rotation_heading(&self, rotation: Option<u32>) -> String {
        match rotation {
            None => t_in(&self.locale, "report.run_heading", &[]),
            Some(rotation) => t_in(
                &self.locale,
                "report.rotation_heading",
                &[("rotation", &rotation.to_string())],
            ),
        }
    }
}

/// 结论 JSON
pub fn write_findings_json<W: Write>(writer: W, findings: &[EvaluationFinding]) -> ExportResult<()> {
    serde_json::to_writer_pretty(writer, findings)?;
    Ok(())
}

// ==========================================
// 单条结论 → 文本
// ==========================================

/// 严重度标记 + 本地化说明
pub fn describe_finding(locale: &str, finding: &EvaluationFinding) -> String {
    let severity_key = match finding.severity {
        Severity::Info => "severity.info",
        Severity::Warning => "severity.warning",
        Severity::Violation => "severity.violation",
    };
    format!(
        "{} {}",
        t_in(locale, severity_key, &[]),
        detail_text(locale, finding)
    )
}

fn detail_text(locale: &str, finding: &EvaluationFinding) -> String {
    match &finding.detail {
        FindingDetail::LeaderCount { count } => {
            let key = if *count == 1 {
                "finding.leader_count_ok"
            } else {
                "finding.leader_count_bad"
            };
            t_in(locale, key, &[("count", &count.to_string())])
        }
        FindingDetail::LeaderPreferenceMismatch {
            leader,
            rotation,
            requested,
            fixed,
        } => t_in(
            locale,
            "finding.leader_preference_mismatch",
            &[
                ("leader", leader.as_str()),
                ("rotation", &rotation.to_string()),
                ("requested", requested.as_str()),
                ("fixed", fixed.as_str()),
            ],
        ),
        FindingDetail::NoGuests => t_in(locale, "finding.no_guests", &[]),
        FindingDetail::GuestWithoutIntroducer { guest } => {
            t_in(locale, "finding.guest_without_introducer", &[("guest", guest.as_str())])
        }
        FindingDetail::IntroducerAbsent { guest, introducer } => t_in(
            locale,
            "finding.introducer_absent",
            &[("guest", guest.as_str()), ("introducer", introducer.as_str())],
        ),
        FindingDetail::MultipleIntroducers { introducers } => t_in(
            locale,
            "finding.multiple_introducers",
            &[("introducers", &join_or_none(locale, introducers))],
        ),
        FindingDetail::GuestsCompliant { guest_count } => t_in(
            locale,
            "finding.guests_compliant",
            &[("count", &guest_count.to_string())],
        ),
        FindingDetail::TableSize {
            size,
            target_min,
            target_max,
        } => t_in(
            locale,
            "finding.table_size",
            &[
                ("size", &size.to_string()),
                ("min", &target_min.to_string()),
                ("max", &target_max.to_string()),
            ],
        ),
        FindingDetail::ManualOverCapacity {
            participant,
            size,
            target_max,
        } => t_in(
            locale,
            "finding.manual_over_capacity",
            &[
                ("participant", participant.as_str()),
                ("size", &size.to_string()),
                ("max", &target_max.to_string()),
            ],
        ),
        FindingDetail::VenueCollision { venues } => t_in(
            locale,
            "finding.venue_collision",
            &[("venues", &join_or_none(locale, &venue_items(venues)))],
        ),
        FindingDetail::NoVenueCollision => t_in(locale, "finding.no_venue_collision", &[]),
        FindingDetail::VenueBalance {
            self_venue,
            other_venue,
        } => t_in(
            locale,
            "finding.venue_balance",
            &[
                ("self_count", &self_venue.to_string()),
                ("other_count", &other_venue.to_string()),
            ],
        ),
        FindingDetail::PastSeatmates { pairs } => {
            let items: Vec<String> = pairs.iter().map(|(a, b)| format!("{} & {}", a, b)).collect();
            t_in(locale, "finding.past_seatmates", &[("pairs", &join_or_none(locale, &items))])
        }
        FindingDetail::NoPastSeatmates => t_in(locale, "finding.no_past_seatmates", &[]),
        FindingDetail::Distribution { counts, even } => {
            let key = match finding.category {
                FindingCategory::CaretakerBalance => "finding.caretaker_distribution",
                _ => "finding.management_distribution",
            };
            let verdict_key = if *even {
                "finding.distribution_even"
            } else {
                "finding.distribution_uneven"
            };
            let items: Vec<String> = counts
                .iter()
                .enumerate()
                .map(|(i, count)| format!("{}:{}", table_label(i as u32), count))
                .collect();
            t_in(
                locale,
                key,
                &[
                    ("counts", &items.join(" ")),
                    ("verdict", &t_in(locale, verdict_key, &[])),
                ],
            )
        }
        FindingDetail::ManualTableMissing {
            participant,
            requested,
        } => t_in(
            locale,
            "finding.manual_table_missing",
            &[("participant", participant.as_str()), ("requested", requested.as_str())],
        ),
        FindingDetail::GroupForced {
            introducer,
            members,
            table,
        } => t_in(
            locale,
            "finding.group_forced",
            &[
                ("introducer", introducer.as_str()),
                ("members", &join_or_none(locale, members)),
                ("table", table.as_str()),
            ],
        ),
        FindingDetail::IndividualForced { participant, table } => t_in(
            locale,
            "finding.individual_forced",
            &[("participant", participant.as_str()), ("table", table.as_str())],
        ),
    }
}

fn venue_items(venues: &[VenueHeadcount]) -> Vec<String> {
    venues
        .iter()
        .map(|v| format!("{}({})", v.venue, v.count))
        .collect()
}

fn join_or_none(locale: &str, items: &[String]) -> String {
    if items.is_empty() {
        t_in(locale, "report.empty_list", &[])
    } else {
        items.join(", ")
    }
}

/// 结论所属范围的简短标识（日志用）
pub fn scope_tag(scope: &FindingScope) -> String {
    match scope {
        FindingScope::Run => "run".to_string(),
        FindingScope::Rotation { rotation } => format!("r{}", rotation),
        FindingScope::Table { rotation, table } => format!("r{}/{}", rotation, table),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_findings() -> Vec<EvaluationFinding> {
        vec![
            EvaluationFinding::new(
                FindingScope::Run,
                FindingCategory::LeaderPreference,
                Severity::Warning,
                FindingDetail::LeaderPreferenceMismatch {
                    leader: "佐藤".to_string(),
                    rotation: 2,
                    requested: "B".to_string(),
                    fixed: "A".to_string(),
                },
            ),
            EvaluationFinding::for_table(
                1,
                "A",
                FindingCategory::LeaderPresence,
                Severity::Info,
                FindingDetail::LeaderCount { count: 1 },
            ),
            EvaluationFinding::for_table(
                1,
                "A",
                FindingCategory::TableSize,
                Severity::Violation,
                FindingDetail::TableSize {
                    size: 9,
                    target_min: 4,
                    target_max: 5,
                },
            ),
            EvaluationFinding::for_table(
                1,
                "B",
                FindingCategory::GuestPlacement,
                Severity::Info,
                FindingDetail::NoGuests,
            ),
            EvaluationFinding::for_rotation(
                1,
                FindingCategory::ManagementBalance,
                Severity::Warning,
                FindingDetail::Distribution {
                    counts: vec![2, 0],
                    even: false,
                },
            ),
        ]
    }

    #[test]
    fn test_render_headings_in_generation_order() {
        let lines = EvaluationReport::new("en").render(&sample_findings());
        assert_eq!(
            lines,
            vec![
                "== Run ==",
                "[warning] 佐藤: rotation 2 requests table B but is fixed to A",
                "== Rotation 1 ==",
                "Table A",
                "[info] 1 table leader",
                "[violation] 9 seated (target 4-5)",
                "Table B",
                "[info] No guests",
                "[warning] Management per table: A:2 B:0 (uneven)",
            ]
        );
    }

    #[test]
    fn test_summary_counts_per_rotation() {
        let lines = EvaluationReport::new("en").summary(&sample_findings(), 2);
        assert_eq!(lines[0], "Rotation 1: 1 violation(s), 1 warning(s)");
        assert_eq!(lines[1], "Rotation 2: 0 violation(s), 0 warning(s)");
    }

    #[test]
    fn test_findings_json_keeps_order() {
        let mut buffer = Vec::new();
        write_findings_json(&mut buffer, &sample_findings()).unwrap();
        let parsed: Vec<EvaluationFinding> = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed, sample_findings());
        assert_eq!(scope_tag(&parsed[2].scope), "r1/A");
    }

    #[test]
    fn test_japanese_text() {
        let finding = EvaluationFinding::for_table(
            1,
            "C",
            FindingCategory::PastSeatmate,
            Severity::Warning,
            FindingDetail::PastSeatmates {
                pairs: vec![("佐藤".to_string(), "鈴木".to_string())],
            },
        );
        assert_eq!(
            describe_finding("ja", &finding),
            "[注意] 過去6ヶ月以内の同席: 佐藤 & 鈴木"
        );
    }
}
