// ==========================================
// 例会分桌轮换系统 - 桌（单轮工作状态）
// ==========================================
// 职责: 单轮内的入座成员与计数器
// 红线: 每轮重新创建，不跨轮复用
// 红线: leader_count ∈ {0,1}（由校验器在放置桌长前保证）
// ==========================================

use crate::domain::participant::Participant;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// 入座方式
// ==========================================
// 手动入座（桌长固定/指定卓番）不参与过去同桌判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Placement {
    Manual,
    Auto,
}

// ==========================================
// Table - 桌
// ==========================================
#[derive(Debug, Clone)]
pub struct Table<'a> {
    label: String,
    seats: Vec<(&'a Participant, Placement)>,

    // ===== 计数器 =====
    management_count: usize,
    caretaker_count: usize,
    leader_count: usize,
    guest_count: usize,
    other_venue_counts: BTreeMap<String, usize>, // 他会场 -> 人数
}

impl<'a> Table<'a> {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            seats: Vec::new(),
            management_count: 0,
            caretaker_count: 0,
            leader_count: 0,
            guest_count: 0,
            other_venue_counts: BTreeMap::new(),
        }
    }

    /// 入座并更新计数器
    ///
    /// 不做任何规则检查，检查由调用方（校验器/编排器）负责
    pub fn seat(&mut self, participant: &'a Participant, placement: Placement, self_venue: &str) {
        if participant.is_management {
            self.management_count += 1;
        }
        if participant.is_caretaker {
            self.caretaker_count += 1;
        }
        if participant.is_leader {
            self.leader_count += 1;
        }
        if participant.is_guest() {
            self.guest_count += 1;
        }
        if participant.is_other_venue(self_venue) {
            *self
                .other_venue_counts
                .entry(participant.venue.clone())
                .or_insert(0) += 1;
        }
        self.seats.push((participant, placement));
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// 按入座顺序的全部成员
    pub fn members(&self) -> impl Iterator<Item = &'a Participant> + '_ {
        self.seats.iter().map(|(p, _)| *p)
    }

    /// 自动入座成员（过去同桌判定仅针对这些成员）
    pub fn auto_members(&self) -> impl Iterator<Item = &'a Participant> + '_ {
        self.seats
            .iter()
            .filter(|(_, placement)| *placement == Placement::Auto)
            .map(|(p, _)| *p)
    }

    pub fn placement_of(&self, name: &str) -> Option<Placement> {
        self.seats
            .iter()
            .find(|(p, _)| p.name == name)
            .map(|(_, placement)| *placement)
    }

    pub fn has_member(&self, name: &str) -> bool {
        self.seats.iter().any(|(p, _)| p.name == name)
    }

    pub fn management_count(&self) -> usize {
        self.management_count
    }

    pub fn caretaker_count(&self) -> usize {
        self.caretaker_count
    }

    pub fn leader_count(&self) -> usize {
        self.leader_count
    }

    pub fn guest_count(&self) -> usize {
        self.guest_count
    }

    /// 指定他会场已入座人数
    pub fn other_venue_count(&self, venue: &str) -> usize {
        self.other_venue_counts.get(venue).copied().unwrap_or(0)
    }

    /// 他会场人数表（按会场名排序）
    pub fn other_venue_counts(&self) -> &BTreeMap<String, usize> {
        &self.other_venue_counts
    }

    /// 他会场总人数
    pub fn other_venue_total(&self) -> usize {
        self.other_venue_counts.values().sum()
    }

    /// 自会场人数
    pub fn self_venue_count(&self) -> usize {
        self.len() - self.other_venue_total()
    }
}
