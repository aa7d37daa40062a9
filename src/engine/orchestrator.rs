// ==========================================
// 例会分桌轮换系统 - 分桌编排器
// ==========================================
// 职责: 按轮执行分桌状态机，汇总评价与输出行
// 流程（每轮严格顺序，不回溯）:
// 0) 初始化: 空桌 + 候选池 + 本轮已入座集合
// 1) 桌长固定卓番
// 2) 其他成员手动指定卓番
// 3) 来宾分组
// 4a) 来宾组整体入座
// 4b) 其余个人按 校验 + 评分 入座
// ==========================================
// 红线: 致命错误中止整个运行，不产出任何轮的结果
// 红线: 轮与轮之间不共享桌状态
// ==========================================

use crate::domain::assignment::{AssignmentRow, SeatingOutcome};
use crate::domain::finding::{EvaluationFinding, FindingCategory, FindingDetail, Severity};
use crate::domain::history::PastSeatingRecord;
use crate::domain::participant::Participant;
use crate::domain::settings::{Settings, MAX_ROTATION_COUNT, MAX_TABLE_COUNT};
use crate::domain::table::{Placement, Table};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::evaluation::RotationEvaluator;
use crate::engine::fixed_leader::FixedLeaderAssignment;
use crate::engine::guest_group::{GuestGroup, GuestGroupBuilder};
use crate::engine::occupancy::TargetOccupancy;
use crate::engine::output_shaper;
use crate::engine::random::RandomSource;
use crate::engine::role::{holds_role, Role};
use crate::engine::scoring::{PlacementScorer, RoleAverages};
use crate::engine::seatmate::SeatmateHistory;
use crate::engine::validator::PlacementValidator;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// 执行全部轮的分桌
///
/// # 参数
/// - roster: 本月名册（顺序决定固定种子下的洗牌结果）
/// - history: 过去分桌记录（窗口外记录被忽略）
/// - settings: 运行设定
/// - rng: 随机源
pub fn assign_tables<R: RandomSource>(
    roster: &[Participant],
    history: &[PastSeatingRecord],
    settings: &Settings,
    rng: &mut R,
) -> EngineResult<SeatingOutcome> {
    SeatingOrchestrator::new(roster, history, settings)?.run(rng)
}

// ==========================================
// SeatingOrchestrator - 分桌编排器
// ==========================================
pub struct SeatingOrchestrator<'a> {
    roster: &'a [Participant],
    settings: &'a Settings,
    history: SeatmateHistory,
    occupancy: TargetOccupancy,
    averages: RoleAverages,
    fixed_leaders: FixedLeaderAssignment,
    run_findings: Vec<EvaluationFinding>, // 运行级结论（桌长指定不一致）
}

impl<'a> SeatingOrchestrator<'a> {
    /// 创建编排器并检查前提条件
    ///
    /// # 错误
    /// - 设定无效 / 名册为空 / 姓名重复
    /// - 桌长缺第1轮指定卓番
    pub fn new(
        roster: &'a [Participant],
        history: &[PastSeatingRecord],
        settings: &'a Settings,
    ) -> EngineResult<Self> {
        validate_settings(settings)?;
        validate_roster(roster)?;

        let (fixed_leaders, run_findings) = FixedLeaderAssignment::derive(roster)?;
        let table_count = settings.table_count as usize;

        Ok(Self {
            roster,
            settings,
            history: SeatmateHistory::from_records(history),
            occupancy: TargetOccupancy::for_roster(roster.len(), table_count),
            averages: RoleAverages::from_roster(roster, table_count),
            fixed_leaders,
            run_findings,
        })
    }

    pub fn occupancy(&self) -> TargetOccupancy {
        self.occupancy
    }

    /// 执行全部轮（全有或全无）
    pub fn run<R: RandomSource>(&self, rng: &mut R) -> EngineResult<SeatingOutcome> {
        info!(
            roster_size = self.roster.len(),
            table_count = self.settings.table_count,
            rotation_count = self.settings.rotation_count,
            target_min = self.occupancy.min,
            target_max = self.occupancy.max,
            history_people = self.history.len(),
            "开始分桌"
        );

        let mut rows: Vec<AssignmentRow> = Vec::new();
        let mut findings = self.run_findings.clone();

        for rotation in 1..=self.settings.rotation_count {
            let (rotation_rows, rotation_findings) = self.run_rotation(rotation, rng)?;
            rows.extend(rotation_rows);
            findings.extend(rotation_findings);
        }

        output_shaper::sort_rows(&mut rows);

        info!(
            rows = rows.len(),
            findings = findings.len(),
            problems = findings.iter().filter(|f| f.is_problem()).count(),
            "分桌完成"
        );
        Ok(SeatingOutcome { rows, findings })
    }

    /// 执行单轮
    #[instrument(skip(self, rng), fields(roster_size = self.roster.len()))]
    fn run_rotation<R: RandomSource>(
        &self,
        rotation: u32,
        rng: &mut R,
    ) -> EngineResult<(Vec<AssignmentRow>, Vec<EvaluationFinding>)> {
        let mut board = RotationBoard::new(rotation, self.settings);

        // ==========================================
        // 阶段1: 桌长固定卓番
        // ==========================================
        self.seat_fixed_leaders(&mut board)?;
        debug!(seated = board.seated.len(), "阶段1: 桌长入座完成");

        // ==========================================
        // 阶段2: 手动指定卓番
        // ==========================================
        let pool = board.unseated(self.roster);
        self.seat_manual_preferences(&mut board, &pool);
        debug!(seated = board.seated.len(), "阶段2: 手动指定入座完成");

        // ==========================================
        // 阶段3: 来宾分组
        // ==========================================
        let pool = board.unseated(self.roster);
        let (groups, remaining) = GuestGroupBuilder::build(&pool);
        debug!(
            groups = groups.len(),
            individuals = remaining.len(),
            "阶段3: 来宾分组完成"
        );

        let mut candidates = self.candidate_order(&remaining);
        rng.shuffle(&mut candidates);

        // ==========================================
        // 阶段4a: 来宾组整体入座
        // ==========================================
        let validator = PlacementValidator::new(&self.settings.self_venue_name, self.occupancy);
        for group in &groups {
            self.seat_group(&mut board, &validator, group);
        }

        // ==========================================
        // 阶段4b: 个人按评分入座
        // ==========================================
        let scorer = PlacementScorer::new(
            &self.settings.self_venue_name,
            self.occupancy,
            self.averages,
            &self.history,
        );
        for participant in candidates {
            self.seat_individual(&mut board, &validator, &scorer, participant, rng);
        }
        debug!(seated = board.seated.len(), "阶段4: 自动入座完成");

        // ==========================================
        // 评价 + 输出
        // ==========================================
        let evaluator = RotationEvaluator::new(self.roster, self.occupancy, &self.history);
        let mut findings = board.findings;
        findings.extend(evaluator.evaluate(rotation, &board.tables));
        let rows = output_shaper::shape_rotation(rotation, &board.tables);

        Ok((rows, findings))
    }

    fn seat_fixed_leaders(&self, board: &mut RotationBoard<'a>) -> EngineResult<()> {
        for leader in self.roster.iter().filter(|p| p.is_leader) {
            let Some(label) = self.fixed_leaders.table_for(&leader.name) else {
                continue;
            };

            let index =
                board
                    .table_index(label)
                    .ok_or_else(|| EngineError::LeaderTableNotFound {
                        leader: leader.name.clone(),
                        rotation: board.rotation,
                        table: label.to_string(),
                    })?;

            if board.tables[index].leader_count() > 0 {
                return Err(EngineError::LeaderTableOccupied {
                    leader: leader.name.clone(),
                    rotation: board.rotation,
                    table: label.to_string(),
                });
            }

            board.seat(index, leader, Placement::Manual);
        }
        Ok(())
    }

    /// 人数上限可被手动指定突破（记警告）；卓番不存在时留在候选池
    fn seat_manual_preferences(&self, board: &mut RotationBoard<'a>, pool: &[&'a Participant]) {
        let rotation = board.rotation;

        for participant in pool.iter().copied().filter(|p| !p.is_leader) {
            let Some(requested) = participant.preference_for(rotation) else {
                continue;
            };

            match board.table_index(requested) {
                Some(index) => {
                    if !board.seat(index, participant, Placement::Manual) {
                        continue;
                    }
                    let size = board.tables[index].len();
                    if size > self.occupancy.max {
                        warn!(
                            participant = %participant.name,
                            table = requested,
                            size,
                            target_max = self.occupancy.max,
                            "手动指定超过人数上限"
                        );
                        board.findings.push(EvaluationFinding::for_table(
                            rotation,
                            requested,
                            FindingCategory::TableSize,
                            Severity::Warning,
                            FindingDetail::ManualOverCapacity {
                                participant: participant.name.clone(),
                                size,
                                target_max: self.occupancy.max,
                            },
                        ));
                    }
                }
                None => {
                    warn!(
                        participant = %participant.name,
                        table = requested,
                        "指定卓番不存在，转为自动入座"
                    );
                    board.findings.push(EvaluationFinding::for_rotation(
                        rotation,
                        FindingCategory::ManualPlacement,
                        Severity::Warning,
                        FindingDetail::ManualTableMissing {
                            participant: participant.name.clone(),
                            requested: requested.to_string(),
                        },
                    ));
                }
            }
        }
    }

    /// 候选顺序: 运营部 → 世话人 → 未固定桌长 → 他会场一般 → 自会场一般
    ///
    /// 同时具有多个角色的人会出现多次，入座后再次出现时跳过
    fn candidate_order(&self, remaining: &[&'a Participant]) -> Vec<&'a Participant> {
        let self_venue = self.settings.self_venue_name.as_str();
        let mut ordered = Vec::with_capacity(remaining.len());

        for role in Role::PLACEMENT_ORDER {
            ordered.extend(
                remaining
                    .iter()
                    .copied()
                    .filter(|p| holds_role(p, role, &[])),
            );
        }

        let general = |p: &&'a Participant| holds_role(p, Role::General, &[]);
        ordered.extend(
            remaining
                .iter()
                .copied()
                .filter(|p| general(p) && p.is_other_venue(self_venue)),
        );
        ordered.extend(
            remaining
                .iter()
                .copied()
                .filter(|p| general(p) && !p.is_other_venue(self_venue)),
        );
        ordered
    }

    /// 来宾组: 合格桌中选人数最少者（同数取卓番靠前）；无合格桌时强制入座最少人数桌
    fn seat_group(
        &self,
        board: &mut RotationBoard<'a>,
        validator: &PlacementValidator<'_>,
        group: &GuestGroup<'a>,
    ) {
        if group.members().any(|m| board.is_seated(&m.name)) {
            return;
        }

        let chosen = board
            .tables
            .iter()
            .enumerate()
            .filter(|(_, table)| validator.accepts_group(group, table))
            .min_by_key(|(_, table)| table.len())
            .map(|(index, _)| index);

        let index = match chosen {
            Some(index) => index,
            None => {
                let index = board.smallest_table();
                let table = board.tables[index].label().to_string();
                warn!(
                    rotation = board.rotation,
                    introducer = %group.introducer.name,
                    table = %table,
                    "来宾组无合格桌，强制入座"
                );
                board.findings.push(EvaluationFinding::for_rotation(
                    board.rotation,
                    FindingCategory::ForcedPlacement,
                    Severity::Warning,
                    FindingDetail::GroupForced {
                        introducer: group.introducer.name.clone(),
                        members: group.member_names(),
                        table,
                    },
                ));
                index
            }
        };

        for member in group.members() {
            board.seat(index, member, Placement::Auto);
        }
    }

    /// 个人: 校验通过的桌中评分最高者；同分时以 1/2 概率替换当前最优
    fn seat_individual<R: RandomSource>(
        &self,
        board: &mut RotationBoard<'a>,
        validator: &PlacementValidator<'_>,
        scorer: &PlacementScorer<'_>,
        participant: &'a Participant,
        rng: &mut R,
    ) {
        if board.is_seated(&participant.name) {
            return;
        }

        let mut best: Option<(usize, f64)> = None;
        for (index, table) in board.tables.iter().enumerate() {
            if !validator.is_placement_valid(participant, table, &board.seated) {
                continue;
            }
            let score = scorer.score(participant, table);
            best = match best {
                None => Some((index, score)),
                Some((_, top)) if score > top => Some((index, score)),
                Some((_, top)) if score == top && rng.coin_flip() => Some((index, score)),
                keep => keep,
            };
        }

        let index = match best {
            Some((index, _)) => index,
            None => {
                let index = board.smallest_table();
                let table = board.tables[index].label().to_string();
                warn!(
                    rotation = board.rotation,
                    participant = %participant.name,
                    table = %table,
                    "无满足硬约束的桌，强制入座"
                );
                board.findings.push(EvaluationFinding::for_rotation(
                    board.rotation,
                    FindingCategory::ForcedPlacement,
                    Severity::Warning,
                    FindingDetail::IndividualForced {
                        participant: participant.name.clone(),
                        table,
                    },
                ));
                index
            }
        };

        board.seat(index, participant, Placement::Auto);
    }
}

// ==========================================
// RotationBoard - 单轮工作状态（每轮新建）
// ==========================================
struct RotationBoard<'a> {
    rotation: u32,
    self_venue: String,
    tables: Vec<Table<'a>>,
    seated: HashSet<&'a str>,
    findings: Vec<EvaluationFinding>, // 入座过程中产生的结论
}

impl<'a> RotationBoard<'a> {
    fn new(rotation: u32, settings: &Settings) -> Self {
        Self {
            rotation,
            self_venue: settings.self_venue_name.clone(),
            tables: settings
                .table_labels()
                .iter()
                .map(|label| Table::new(label))
                .collect(),
            seated: HashSet::new(),
            findings: Vec::new(),
        }
    }

    fn table_index(&self, label: &str) -> Option<usize> {
        self.tables.iter().position(|t| t.label() == label)
    }

    /// 人数最少的桌（同数取卓番靠前）
    fn smallest_table(&self) -> usize {
        self.tables
            .iter()
            .enumerate()
            .min_by_key(|(_, table)| table.len())
            .map(|(index, _)| index)
            .unwrap_or(0)
    }

    fn is_seated(&self, name: &str) -> bool {
        self.seated.contains(name)
    }

    /// 名册顺序的未入座者
    fn unseated(&self, roster: &'a [Participant]) -> Vec<&'a Participant> {
        roster
            .iter()
            .filter(|p| !self.is_seated(&p.name))
            .collect()
    }

    /// 入座；本轮已入座时不做任何事并返回 false
    fn seat(&mut self, index: usize, participant: &'a Participant, placement: Placement) -> bool {
        if !self.seated.insert(participant.name.as_str()) {
            return false;
        }
        self.tables[index].seat(participant, placement, &self.self_venue);
        true
    }
}

fn validate_settings(settings: &Settings) -> EngineResult<()> {
    if settings.self_venue_name.trim().is_empty() {
        return Err(EngineError::InvalidSettings("自会场名为空".to_string()));
    }
    if settings.rotation_count == 0 || settings.rotation_count > MAX_ROTATION_COUNT {
        return Err(EngineError::InvalidSettings(format!(
            "轮换次数必须在 1..={} 之间: {}",
            MAX_ROTATION_COUNT, settings.rotation_count
        )));
    }
    if settings.table_count == 0 || settings.table_count > MAX_TABLE_COUNT {
        return Err(EngineError::InvalidSettings(format!(
            "桌数必须在 1..={} 之间: {}",
            MAX_TABLE_COUNT, settings.table_count
        )));
    }
    Ok(())
}

fn validate_roster(roster: &[Participant]) -> EngineResult<()> {
    if roster.is_empty() {
        return Err(EngineError::EmptyRoster);
    }
    let mut names = HashSet::new();
    for participant in roster {
        if !names.insert(participant.name.as_str()) {
            return Err(EngineError::DuplicateParticipant(participant.name.clone()));
        }
    }
    Ok(())
}
