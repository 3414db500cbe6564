//! 図書館の貸出管理サービス
//!
//! 蔵書カタログ、利用者ディレクトリ、貸出台帳と、
//! ダッシュボード向けの集計（貸出状況・著者別蔵書数・日別貸出推移）を提供する。

pub mod adapters;
pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
