use crate::adapters::memory::{InMemoryCatalog, InMemoryLedger, InMemoryUserDirectory};
use crate::domain::statistics::{DEFAULT_TREND_DAYS, MAX_TREND_DAYS};
use crate::ports::*;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// 書籍・台帳・利用者にまたがる処理の排他制御
///
/// 更新系の処理は書き込みロックを確認から更新まで保持し、
/// 参照系の処理は読み取りロックを保持する。
/// これにより同じ書籍への同時貸出は1件だけが成功し、
/// 参照側が貸出フラグの切り替え途中の状態を見ることはない。
#[derive(Debug, Default)]
pub struct TransactionGate {
    lock: RwLock<()>,
}

impl TransactionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新系の処理に入る
    pub async fn write(&self) -> RwLockWriteGuard<'_, ()> {
        self.lock.write().await
    }

    /// 参照系の処理に入る
    pub async fn read(&self) -> RwLockReadGuard<'_, ()> {
        self.lock.read().await
    }
}

/// 統計の設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatisticsSettings {
    /// `days`未指定時の貸出推移の日数
    pub default_trend_days: u32,
    /// 貸出推移の日数の上限
    pub max_trend_days: u32,
}

impl Default for StatisticsSettings {
    fn default() -> Self {
        Self {
            default_trend_days: DEFAULT_TREND_DAYS,
            max_trend_days: MAX_TREND_DAYS,
        }
    }
}

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞いは持たず、各サービス関数に引数として渡す。
/// クローンしても`gate`は共有される。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub catalog: Arc<dyn Catalog>,
    pub user_directory: Arc<dyn UserDirectory>,
    pub ledger: Arc<dyn Ledger>,
    pub gate: Arc<TransactionGate>,
    pub statistics: StatisticsSettings,
}

impl ServiceDependencies {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        user_directory: Arc<dyn UserDirectory>,
        ledger: Arc<dyn Ledger>,
    ) -> Self {
        Self {
            catalog,
            user_directory,
            ledger,
            gate: Arc::new(TransactionGate::new()),
            statistics: StatisticsSettings::default(),
        }
    }

    /// インメモリのアダプターで構成する
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryCatalog::new()),
            Arc::new(InMemoryUserDirectory::new()),
            Arc::new(InMemoryLedger::new()),
        )
    }

    pub fn with_statistics(mut self, statistics: StatisticsSettings) -> Self {
        self.statistics = statistics;
        self
    }
}
