// ==========================================
// 例会分桌轮换系统 - 入座评分
// ==========================================
// 职责: 计算"参加者入座某桌后"的期望度（越高越好）
// 红线: 不修改桌状态，只模拟评分所需的计数器
// ==========================================
// 构成（加法）:
// 1) 人数: 入座后人数在 [min,max] 内 +1000 - 10×距离；超过 max -5000
// 2) 角色均衡: -100×|运营部数-平均|，世话人同理
// 3) 会场均衡: -50×|自会场数-他会场数|
// 4) 过去同桌: 与已自动入座成员有过去同桌 -100
// ==========================================

use crate::domain::participant::Participant;
use crate::domain::table::Table;
use crate::engine::occupancy::TargetOccupancy;
use crate::engine::seatmate::SeatmateHistory;

pub const CAPACITY_FIT_BONUS: f64 = 1000.0;
pub const CAPACITY_DISTANCE_WEIGHT: f64 = 10.0;
pub const OVER_CAPACITY_PENALTY: f64 = 5000.0;
pub const ROLE_BALANCE_WEIGHT: f64 = 100.0;
pub const VENUE_BALANCE_WEIGHT: f64 = 50.0;
pub const PAST_SEATMATE_PENALTY: f64 = 100.0;

// ==========================================
// RoleAverages - 全名册角色平均数（每桌）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoleAverages {
    pub management: f64,
    pub caretaker: f64,
}

impl RoleAverages {
    pub fn from_roster(roster: &[Participant], table_count: usize) -> Self {
        let tables = table_count.max(1) as f64;
        let management = roster.iter().filter(|p| p.is_management).count() as f64;
        let caretaker = roster.iter().filter(|p| p.is_caretaker).count() as f64;
        Self {
            management: management / tables,
            caretaker: caretaker / tables,
        }
    }
}

// ==========================================
// Projection - 假设入座后的计数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    pub size: usize,
    pub management: usize,
    pub caretaker: usize,
    pub self_venue: usize,
    pub other_venue: usize,
}

// ==========================================
// PlacementScorer
// ==========================================
pub struct PlacementScorer<'c> {
    self_venue: &'c str,
    occupancy: TargetOccupancy,
    averages: RoleAverages,
    history: &'c SeatmateHistory,
}

impl<'c> PlacementScorer<'c> {
    pub fn new(
        self_venue: &'c str,
        occupancy: TargetOccupancy,
        averages: RoleAverages,
        history: &'c SeatmateHistory,
    ) -> Self {
        Self {
            self_venue,
            occupancy,
            averages,
            history,
        }
    }

    /// 模拟入座后的计数器
    pub fn project(&self, participant: &Participant, table: &Table<'_>) -> Projection {
        let is_other = participant.is_other_venue(self.self_venue);
        Projection {
            size: table.len() + 1,
            management: table.management_count() + usize::from(participant.is_management),
            caretaker: table.caretaker_count() + usize::from(participant.is_caretaker),
            self_venue: table.self_venue_count() + usize::from(!is_other),
            other_venue: table.other_venue_total() + usize::from(is_other),
        }
    }

    /// 入座评分
    pub fn score(&self, participant: &Participant, table: &Table<'_>) -> f64 {
        let projected = self.project(participant, table);

        self.capacity_term(projected.size)
            + self.role_balance_term(&projected)
            + self.venue_balance_term(&projected)
            + self.past_seatmate_term(participant, table)
    }

    /// 人数项
    ///
    /// 范围宽度至多为 1，范围内的距离项恒为 0
    pub fn capacity_term(&self, size: usize) -> f64 {
        if self.occupancy.contains(size) {
            let to_min = size.abs_diff(self.occupancy.min);
            let to_max = size.abs_diff(self.occupancy.max);
            CAPACITY_FIT_BONUS - CAPACITY_DISTANCE_WEIGHT * to_min.min(to_max) as f64
        } else if size > self.occupancy.max {
            -OVER_CAPACITY_PENALTY
        } else {
            0.0
        }
    }

    fn role_balance_term(&self, projected: &Projection) -> f64 {
        let management_gap = (projected.management as f64 - self.averages.management).abs();
        let caretaker_gap = (projected.caretaker as f64 - self.averages.caretaker).abs();
        -ROLE_BALANCE_WEIGHT * (management_gap + caretaker_gap)
    }

    fn venue_balance_term(&self, projected: &Projection) -> f64 {
        -VENUE_BALANCE_WEIGHT * projected.self_venue.abs_diff(projected.other_venue) as f64
    }

    /// 过去同桌项（仅与已自动入座成员比较，手动入座成员不计）
    fn past_seatmate_term(&self, participant: &Participant, table: &Table<'_>) -> f64 {
        let conflict = table
            .auto_members()
            .any(|mate| self.history.shared_past_table(&participant.name, &mate.name));
        if conflict {
            -PAST_SEATMATE_PENALTY
        } else {
            0.0
        }
    }
}
