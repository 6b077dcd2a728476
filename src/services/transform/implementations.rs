// アイテム変換の具象実装

use crate::core::{ItemTransform, WorkItem};
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// ペイロードを定数倍する変換
#[derive(Debug, Clone)]
pub struct ScaleTransform {
    factor: f64,
}

impl ScaleTransform {
    pub fn new(factor: f64) -> Self {
        Self { factor }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }
}

impl Default for ScaleTransform {
    fn default() -> Self {
        Self::new(2.0)
    }
}

#[async_trait]
impl ItemTransform for ScaleTransform {
    async fn transform(&self, item: &WorkItem) -> Result<f64> {
        let value = item.payload * self.factor;
        if !value.is_finite() {
            anyhow::bail!("item #{} scaled to a non-finite value", item.id);
        }
        Ok(value)
    }
}

/// 固定の処理時間を挟んでから内側の変換を実行する
#[derive(Debug, Clone)]
pub struct DelayedTransform<T> {
    inner: T,
    delay: Duration,
}

impl<T: ItemTransform> DelayedTransform<T> {
    pub fn new(inner: T, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait]
impl<T: ItemTransform> ItemTransform for DelayedTransform<T> {
    async fn transform(&self, item: &WorkItem) -> Result<f64> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.transform(item).await
    }
}

/// クロージャを変換として使うアダプタ
#[derive(Clone)]
pub struct FnTransform<F> {
    func: F,
}

impl<F> FnTransform<F>
where
    F: Fn(&WorkItem) -> Result<f64> + Send + Sync,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<F> ItemTransform for FnTransform<F>
where
    F: Fn(&WorkItem) -> Result<f64> + Send + Sync,
{
    async fn transform(&self, item: &WorkItem) -> Result<f64> {
        (self.func)(item)
    }
}
