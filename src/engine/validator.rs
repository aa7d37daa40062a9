// ==========================================
// 例会分桌轮换系统 - 硬约束校验器
// ==========================================
// 职责: 判定自动入座是否合法（纯函数）
// 红线: 无状态、无副作用、无 I/O 操作
// 红线: 过去同桌不是硬约束（仅在评分中扣分）
// ==========================================

use crate::domain::participant::Participant;
use crate::domain::table::Table;
use crate::engine::guest_group::GuestGroup;
use crate::engine::occupancy::TargetOccupancy;
use std::collections::HashSet;
use std::fmt;

// ==========================================
// 拒绝原因
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    AlreadySeated,  // 本轮已入座
    VenueCollision, // 同一他会场已有人
    TableFull,      // 已达人数上限
    LeaderPresent,  // 已有桌长
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::AlreadySeated => write!(f, "ALREADY_SEATED"),
            Rejection::VenueCollision => write!(f, "VENUE_COLLISION"),
            Rejection::TableFull => write!(f, "TABLE_FULL"),
            Rejection::LeaderPresent => write!(f, "LEADER_PRESENT"),
        }
    }
}

// ==========================================
// PlacementValidator - 硬约束校验器
// ==========================================
pub struct PlacementValidator<'s> {
    self_venue: &'s str,
    occupancy: TargetOccupancy,
}

impl<'s> PlacementValidator<'s> {
    pub fn new(self_venue: &'s str, occupancy: TargetOccupancy) -> Self {
        Self {
            self_venue,
            occupancy,
        }
    }

    /// 检查单人入座
    ///
    /// # 规则（按顺序，命中即拒绝）
    /// 1. 本轮已入座 → AlreadySeated
    /// 2. 他会场成员且该桌已有同会场成员 → VenueCollision
    /// 3. 桌内人数 ≥ target_max → TableFull
    /// 4. 本人为桌长且该桌已有桌长 → LeaderPresent
    pub fn check(
        &self,
        participant: &Participant,
        table: &Table<'_>,
        seated: &HashSet<&str>,
    ) -> Result<(), Rejection> {
        // 规则 1: 一人一轮只入座一次
        if seated.contains(participant.name.as_str()) {
            return Err(Rejection::AlreadySeated);
        }

        // 规则 2: 同一他会场不同桌
        if participant.is_other_venue(self.self_venue)
            && table.other_venue_count(&participant.venue) > 0
        {
            return Err(Rejection::VenueCollision);
        }

        // 规则 3: 人数上限
        if table.len() >= self.occupancy.max {
            return Err(Rejection::TableFull);
        }

        // 规则 4: 每桌桌长仅 1 名
        if participant.is_leader && table.leader_count() > 0 {
            return Err(Rejection::LeaderPresent);
        }

        Ok(())
    }

    /// 单人入座是否合法
    pub fn is_placement_valid(
        &self,
        participant: &Participant,
        table: &Table<'_>,
        seated: &HashSet<&str>,
    ) -> bool {
        self.check(participant, table, seated).is_ok()
    }

    /// 来宾组整体入座是否合法
    ///
    /// # 规则
    /// - 组内每名他会场成员在该桌都没有同会场成员
    /// - 入座后人数不超过 target_max
    pub fn accepts_group(&self, group: &GuestGroup<'_>, table: &Table<'_>) -> bool {
        let venue_clear = group.members().all(|member| {
            !member.is_other_venue(self.self_venue) || table.other_venue_count(&member.venue) == 0
        });
        venue_clear && table.len() + group.len() <= self.occupancy.max
    }
}
