// ==========================================
// 例会分桌轮换系统 - 输出整形
// ==========================================
// 职责: 桌内按角色优先级 + 姓名排序，展开为 (轮, 卓番, 成员) 行
// 排序: 桌长(0) < 来宾(1) < 同桌来宾的介绍人(2) < 世话人(3) < 运营部(4) < 其他(5)
// 同级: 姓名按日语排序规则的基本强度比较（汉字按读音序，忽略大小写/浊点/假名种类）
// ==========================================

use crate::domain::assignment::{AssignmentRow, RowNote};
use crate::domain::participant::Participant;
use crate::domain::table::Table;
use crate::engine::role::display_role;
use icu_collator::{Collator, CollatorOptions, Strength};
use icu_locid::locale;
use std::cmp::Ordering;
use tracing::warn;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// 片假名 -> 平假名的码位偏移
const KATAKANA_OFFSET: u32 = 0x60;

thread_local! {
    static NAME_COLLATOR: Option<Collator> = japanese_collator();
}

/// ja 排序规则，Primary 强度
fn japanese_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Primary);
    match Collator::try_new(&locale!("ja").into(), options) {
        Ok(collator) => Some(collator),
        Err(err) => {
            warn!(error = ?err, "日语排序规则加载失败，改用分解比较键");
            None
        }
    }
}

/// 排序规则不可用时的比较键
///
/// NFKD 分解后去掉结合符号、转小写、片假名折叠为平假名
pub fn collation_key(name: &str) -> String {
    name.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(fold_katakana)
        .collect()
}

fn fold_katakana(c: char) -> char {
    match c {
        '\u{30A1}'..='\u{30F6}' => char::from_u32(c as u32 - KATAKANA_OFFSET).unwrap_or(c),
        _ => c,
    }
}

/// 基本强度比较；排序规则判定相同时按原文比较，保证全序
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let primary = NAME_COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => collation_key(a).cmp(&collation_key(b)),
    });
    primary.then_with(|| a.cmp(b))
}

/// 桌内成员的展示顺序
pub fn ordered_members<'a>(table: &Table<'a>) -> Vec<&'a Participant> {
    let mates: Vec<&'a Participant> = table.members().collect();
    let mut keyed: Vec<(u8, &'a Participant)> = mates
        .iter()
        .map(|p| (display_role(p, &mates).display_priority(), *p))
        .collect();

    keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| compare_names(&a.1.name, &b.1.name)));
    keyed.into_iter().map(|(_, p)| p).collect()
}

/// 将一轮的桌展开为输出行（卓番升序）
pub fn shape_rotation(rotation: u32, tables: &[Table<'_>]) -> Vec<AssignmentRow> {
    let mut ordered: Vec<&Table<'_>> = tables.iter().collect();
    ordered.sort_by(|a, b| a.label().cmp(b.label()));

    ordered
        .into_iter()
        .flat_map(|table| {
            ordered_members(table)
                .into_iter()
                .map(move |member| to_row(rotation, table.label(), member))
        })
        .collect()
}

/// 全部行按 (轮, 卓番) 稳定排序，桌内顺序保持不变
pub fn sort_rows(rows: &mut [AssignmentRow]) {
    rows.sort_by(|a, b| {
        a.rotation
            .cmp(&b.rotation)
            .then_with(|| a.table_label.cmp(&b.table_label))
    });
}

fn to_row(rotation: u32, table_label: &str, member: &Participant) -> AssignmentRow {
    AssignmentRow {
        rotation,
        table_label: table_label.to_string(),
        name: member.name.clone(),
        venue: member.venue.clone(),
        is_management: member.is_management,
        is_leader: member.is_leader,
        is_caretaker: member.is_caretaker,
        introducer: member
            .introducer
            .as_deref()
            .map(str::trim)
            .filter(|i| !i.is_empty())
            .map(str::to_string),
        membership: member.membership,
        note: member.is_leader.then_some(RowNote::TableLeader),
    }
}
