//! Caller-supplied callbacks attached to criteria.
//!
//! Callbacks may be synchronous or asynchronous; both are stored as a boxed
//! future factory so the evaluator can await them uniformly.

use crate::criteria::Criterion;
use crate::value::Value;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Future returned by a callback
pub type CallbackFuture<T> = BoxFuture<'static, anyhow::Result<T>>;

/// A shareable, possibly asynchronous function from `A` to `T`
pub struct Callback<A, T> {
    func: Arc<dyn Fn(A) -> CallbackFuture<T> + Send + Sync>,
}

impl<A: 'static, T: Send + 'static> Callback<A, T> {
    /// Wrap an async function
    pub fn new<F, Fut>(func: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        Self {
            func: Arc::new(move |args: A| -> CallbackFuture<T> { Box::pin(func(args)) }),
        }
    }

    /// Wrap a synchronous function
    pub fn sync<F>(func: F) -> Self
    where
        F: Fn(A) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Self::new(move |args| std::future::ready(func(args)))
    }

    /// Invoke the callback
    pub async fn call(&self, args: A) -> anyhow::Result<T> {
        (self.func)(args).await
    }
}

impl<A, T> Clone for Callback<A, T> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
        }
    }
}

impl<A, T> fmt::Debug for Callback<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<callback>")
    }
}

/// Arguments handed to a computed match value
#[derive(Debug, Clone)]
pub struct MatchValueArgs {
    pub context: Value,
    pub criterion: Criterion,
    /// The record being evaluated
    pub value: Value,
}

/// Arguments handed to a criteria mapper
#[derive(Debug, Clone)]
pub struct CriteriaMapperArgs {
    pub criterion: Criterion,
    pub value: Value,
    pub context: Value,
}

/// Arguments handed to a value mapper
#[derive(Debug, Clone)]
pub struct ValueMapperArgs {
    pub value: Value,
    pub criterion: Criterion,
    pub context: Value,
}

/// Arguments handed to a CUSTOM predicate
#[derive(Debug, Clone)]
pub struct CustomArgs {
    pub match_value: Value,
    pub value: Value,
}

pub type MatchValueFn = Callback<MatchValueArgs, Value>;
pub type CriteriaMapper = Callback<CriteriaMapperArgs, Criterion>;
pub type ValueMapper = Callback<ValueMapperArgs, Value>;
pub type CustomPredicate = Callback<CustomArgs, bool>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sync_and_async_callbacks() -> anyhow::Result<()> {
        let double: Callback<f64, f64> = Callback::sync(|x| Ok(x * 2.0));
        assert_eq!(double.call(2.0).await?, 4.0);

        let delayed: Callback<f64, f64> = Callback::new(|x| async move {
            tokio::task::yield_now().await;
            Ok(x + 1.0)
        });
        assert_eq!(delayed.clone().call(1.0).await?, 2.0);

        let failing: Callback<(), bool> = Callback::sync(|_| anyhow::bail!("boom"));
        assert_eq!(failing.call(()).await.unwrap_err().to_string(), "boom");
        Ok(())
    }
}
