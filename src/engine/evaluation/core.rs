use crate::domain::finding::{
    EvaluationFinding, FindingCategory, FindingDetail, Severity, VenueHeadcount,
};
use crate::domain::participant::Participant;
use crate::domain::table::Table;
use crate::engine::occupancy::TargetOccupancy;
use crate::engine::seatmate::SeatmateHistory;
use tracing::debug;

// ==========================================
// RotationEvaluator - 每轮评价
// ==========================================
pub struct RotationEvaluator<'c> {
    occupancy: TargetOccupancy,
    history: &'c SeatmateHistory,
    roster_management: usize, // 名册内运营部总数
    roster_caretaker: usize,  // 名册内世话人总数
}

impl<'c> RotationEvaluator<'c> {
    pub fn new(
        roster: &[Participant],
        occupancy: TargetOccupancy,
        history: &'c SeatmateHistory,
    ) -> Self {
        Self {
            occupancy,
            history,
            roster_management: roster.iter().filter(|p| p.is_management).count(),
            roster_caretaker: roster.iter().filter(|p| p.is_caretaker).count(),
        }
    }

    /// 评价一轮: 各桌检查（卓番顺序）后接分布检查
    pub fn evaluate(&self, rotation: u32, tables: &[Table<'_>]) -> Vec<EvaluationFinding> {
        let mut findings: Vec<EvaluationFinding> = tables
            .iter()
            .flat_map(|table| self.evaluate_table(rotation, table))
            .collect();
        findings.extend(self.evaluate_distribution(rotation, tables));

        debug!(
            rotation,
            findings = findings.len(),
            problems = findings.iter().filter(|f| f.is_problem()).count(),
            "本轮评价完成"
        );
        findings
    }

    /// 单桌评价（固定检查顺序）
    pub fn evaluate_table(&self, rotation: u32, table: &Table<'_>) -> Vec<EvaluationFinding> {
        let label = table.label();
        let finding = |category, severity, detail| {
            EvaluationFinding::for_table(rotation, label, category, severity, detail)
        };

        let mut findings = Vec::new();

        // 1. 桌长在席: 恰好 1 名
        let leaders = table.members().filter(|m| m.is_leader).count();
        findings.push(finding(
            FindingCategory::LeaderPresence,
            if leaders == 1 {
                Severity::Info
            } else {
                Severity::Violation
            },
            FindingDetail::LeaderCount { count: leaders },
        ));

        // 2. 来宾与介绍人
        findings.extend(
            self.guest_details(table)
                .into_iter()
                .map(|(severity, detail)| finding(FindingCategory::GuestPlacement, severity, detail)),
        );

        // 3. 人数
        let size = table.len();
        findings.push(finding(
            FindingCategory::TableSize,
            if self.occupancy.contains(size) {
                Severity::Info
            } else {
                Severity::Violation
            },
            FindingDetail::TableSize {
                size,
                target_min: self.occupancy.min,
                target_max: self.occupancy.max,
            },
        ));

        // 4. 同一他会场同桌
        let venues: Vec<VenueHeadcount> = table
            .other_venue_counts()
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(venue, count)| VenueHeadcount {
                venue: venue.clone(),
                count: *count,
            })
            .collect();
        findings.push(if venues.is_empty() {
            finding(
                FindingCategory::VenueCollision,
                Severity::Info,
                FindingDetail::NoVenueCollision,
            )
        } else {
            finding(
                FindingCategory::VenueCollision,
                Severity::Violation,
                FindingDetail::VenueCollision { venues },
            )
        });

        // 5. 会场比例（仅信息）
        findings.push(finding(
            FindingCategory::VenueBalance,
            Severity::Info,
            FindingDetail::VenueBalance {
                self_venue: table.self_venue_count(),
                other_venue: table.other_venue_total(),
            },
        ));

        // 6. 过去同桌（仅自动入座成员之间）
        let pairs = self.past_seatmate_pairs(table);
        findings.push(if pairs.is_empty() {
            finding(
                FindingCategory::PastSeatmate,
                Severity::Info,
                FindingDetail::NoPastSeatmates,
            )
        } else {
            finding(
                FindingCategory::PastSeatmate,
                Severity::Warning,
                FindingDetail::PastSeatmates { pairs },
            )
        });

        findings
    }

    /// 运营部 / 世话人分布
    ///
    /// 均等: max - min ≤ 1；名册内无该角色时视为均等
    pub fn evaluate_distribution(
        &self,
        rotation: u32,
        tables: &[Table<'_>],
    ) -> Vec<EvaluationFinding> {
        let management: Vec<usize> = tables.iter().map(|t| t.management_count()).collect();
        let caretaker: Vec<usize> = tables.iter().map(|t| t.caretaker_count()).collect();

        vec![
            distribution_finding(
                rotation,
                FindingCategory::ManagementBalance,
                management,
                self.roster_management,
            ),
            distribution_finding(
                rotation,
                FindingCategory::CaretakerBalance,
                caretaker,
                self.roster_caretaker,
            ),
        ]
    }

    fn guest_details(&self, table: &Table<'_>) -> Vec<(Severity, FindingDetail)> {
        let guests: Vec<&Participant> = table.members().filter(|m| m.is_guest()).collect();
        if guests.is_empty() {
            return vec![(Severity::Info, FindingDetail::NoGuests)];
        }

        let mut details = Vec::new();
        let mut introducers: Vec<String> = Vec::new();

        for guest in &guests {
            match guest.guest_introducer() {
                None => details.push((
                    Severity::Violation,
                    FindingDetail::GuestWithoutIntroducer {
                        guest: guest.name.clone(),
                    },
                )),
                Some(introducer) => {
                    if !introducers.iter().any(|i| i == introducer) {
                        introducers.push(introducer.to_string());
                    }
                    if !table.has_member(introducer) {
                        details.push((
                            Severity::Violation,
                            FindingDetail::IntroducerAbsent {
                                guest: guest.name.clone(),
                                introducer: introducer.to_string(),
                            },
                        ));
                    }
                }
            }
        }

        if introducers.len() > 1 {
            details.push((
                Severity::Violation,
                FindingDetail::MultipleIntroducers { introducers },
            ));
        }

        if details.is_empty() {
            details.push((
                Severity::Info,
                FindingDetail::GuestsCompliant {
                    guest_count: guests.len(),
                },
            ));
        }
        details
    }

    fn past_seatmate_pairs(&self, table: &Table<'_>) -> Vec<(String, String)> {
        let auto: Vec<&Participant> = table.auto_members().collect();
        let mut pairs = Vec::new();
        for (i, first) in auto.iter().enumerate() {
            for second in &auto[i + 1..] {
                if self.history.shared_past_table(&first.name, &second.name) {
                    pairs.push((first.name.clone(), second.name.clone()));
                }
            }
        }
        pairs
    }
}

fn distribution_finding(
    rotation: u32,
    category: FindingCategory,
    counts: Vec<usize>,
    roster_total: usize,
) -> EvaluationFinding {
    let spread = match (counts.iter().max(), counts.iter().min()) {
        (Some(max), Some(min)) => max - min,
        _ => 0,
    };
    let even = roster_total == 0 || spread <= 1;

    EvaluationFinding::for_rotation(
        rotation,
        category,
        if even {
            Severity::Info
        } else {
            Severity::Warning
        },
        FindingDetail::Distribution { counts, even },
    )
}
