use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::access::AccessGuard;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{
    AlertRepository, ApprovalLocks, ApprovalRepository, AttemptLogRepository, ZoneLocks,
    ZoneRepository,
};
use crate::notify::{NotificationDispatcher, TracingDispatcher};
use crate::utils::AppError;

/// 服务器状态 - 持有所有共享组件的引用
///
/// 浅拷贝（Arc / Surreal 句柄），每个请求处理器按需克隆。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项（不可变） |
/// | db | 嵌入式数据库 |
/// | zone_locks | 区域变更锁（每 zone 一把 + 建号锁） |
/// | approval_locks | 审批开启锁（每 actor 一把） |
/// | dispatcher | 告警/审批结果通知出口 |
#[derive(Clone)]
pub struct GuardState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// 区域注册表的变更锁
    pub zone_locks: Arc<ZoneLocks>,
    /// 审批请求开启锁
    pub approval_locks: Arc<ApprovalLocks>,
    /// 通知出口
    pub dispatcher: Arc<dyn NotificationDispatcher>,
}

impl GuardState {
    /// 初始化服务器状态：工作目录 → 数据库 → 共享组件
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_dir().join("guard.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        Ok(Self {
            config: config.clone(),
            db: db_service.db,
            zone_locks: Arc::new(ZoneLocks::new()),
            approval_locks: Arc::new(ApprovalLocks::new()),
            dispatcher: Arc::new(TracingDispatcher),
        })
    }

    /// 测试用：内存数据库 + 默认配置
    pub async fn for_tests() -> Result<Self, AppError> {
        let db_service = DbService::memory().await?;
        Ok(Self {
            config: Config::from_env(),
            db: db_service.db,
            zone_locks: Arc::new(ZoneLocks::new()),
            approval_locks: Arc::new(ApprovalLocks::new()),
            dispatcher: Arc::new(TracingDispatcher),
        })
    }

    /// 替换通知出口（部署方接入真实推送时使用）
    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn NotificationDispatcher>) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    // ===== Repository accessors =====

    pub fn zones(&self) -> ZoneRepository {
        ZoneRepository::new(self.db.clone(), self.zone_locks.clone())
    }

    pub fn attempts(&self) -> AttemptLogRepository {
        AttemptLogRepository::new(self.db.clone())
    }

    pub fn approvals(&self) -> ApprovalRepository {
        ApprovalRepository::new(
            self.db.clone(),
            self.config.approval_policy(),
            self.approval_locks.clone(),
        )
    }

    pub fn alerts(&self) -> AlertRepository {
        AlertRepository::new(self.db.clone())
    }

    /// The access-check orchestrator
    pub fn access_guard(&self) -> AccessGuard {
        AccessGuard::new(
            self.db.clone(),
            self.zone_locks.clone(),
            self.approval_locks.clone(),
            self.dispatcher.clone(),
            self.config.approval_policy(),
        )
    }
}
