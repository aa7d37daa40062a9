// ==========================================
// 例会分桌轮换系统 - 领域类型定义
// ==========================================
// 职责: 会员区分、开催月等基础值类型
// 序列化格式: SCREAMING_SNAKE_CASE（与导出文件一致）
// ==========================================

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 会员区分 (Membership Tier)
// ==========================================
// 原始名册中的取值: 正会員以上 / 準会員 / ゲスト
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipTier {
    RegularOrAbove, // 正会员及以上
    Associate,      // 准会员
    Guest,          // 来宾（需有介绍人）
}

impl MembershipTier {
    /// 解析名册中的会员区分
    ///
    /// 同时接受日文原始取值和英文别名，无法识别时返回 None
    pub fn parse(raw: &str) -> Option<Self> {
        let value = raw.trim();
        match value {
            "正会員以上" | "正会員" => return Some(MembershipTier::RegularOrAbove),
            "準会員" => return Some(MembershipTier::Associate),
            "ゲスト" => return Some(MembershipTier::Guest),
            _ => {}
        }

        match value.to_ascii_lowercase().as_str() {
            "regular" | "regular_or_above" | "member" => Some(MembershipTier::RegularOrAbove),
            "associate" => Some(MembershipTier::Associate),
            "guest" => Some(MembershipTier::Guest),
            _ => None,
        }
    }

    /// 名册存储中使用的标签
    pub fn store_label(&self) -> &'static str {
        match self {
            MembershipTier::RegularOrAbove => "正会員以上",
            MembershipTier::Associate => "準会員",
            MembershipTier::Guest => "ゲスト",
        }
    }
}

impl fmt::Display for MembershipTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MembershipTier::RegularOrAbove => write!(f, "REGULAR_OR_ABOVE"),
            MembershipTier::Associate => write!(f, "ASSOCIATE"),
            MembershipTier::Guest => write!(f, "GUEST"),
        }
    }
}

// ==========================================
// 开催月 (Year-Month, YYYYMM)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// 构造开催月，月份不在 1..=12 时返回 None
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// 从 YYYYMM 数值解析（必须恰好 6 位）
    pub fn from_number(value: i64) -> Option<Self> {
        if !(100_000..=999_999).contains(&value) {
            return None;
        }
        Self::new((value / 100) as i32, (value % 100) as u32)
    }

    /// 从 YYYYMM 文本解析
    ///
    /// Excel 数值单元格可能带 ".0" 后缀，一并接受
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_suffix(".0").unwrap_or(trimmed);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        digits.parse::<i64>().ok().and_then(Self::from_number)
    }

    /// 本地时间的当前月
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    /// YYYYMM 数值形式
    pub fn as_number(&self) -> i64 {
        self.year as i64 * 100 + self.month as i64
    }

    /// 距离更早月份的月数差（self - earlier）
    ///
    /// # 示例
    /// ```
    /// use seating_rotation::domain::YearMonth;
    /// let now = YearMonth::new(2025, 2).unwrap();
    /// let past = YearMonth::new(2024, 11).unwrap();
    /// assert_eq!(now.months_since(&past), 3);
    /// ```
    pub fn months_since(&self, earlier: &YearMonth) -> i64 {
        (self.year as i64 - earlier.year as i64) * 12 + (self.month as i64 - earlier.month as i64)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}", self.year, self.month)
    }
}
