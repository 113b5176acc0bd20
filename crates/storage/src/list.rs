//! Positional arguments (`request.args`) with safe, cast-aware access.
//!
//! `list.at(i)` never panics on a missing position: it falls back to an
//! explicit default, then to `otherwise`, then to `None`. A present value
//! that fails its cast is the only hard failure and surfaces as
//! [`BadRequest`].

use std::fmt;
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::BadRequest;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct List<T = String> {
    items: Vec<T>,
}

impl<T> Default for List<T> {
    fn default() -> Self { Self { items: Vec::new() } }
}

impl List<String> {
    /// Split a URL path into its non-empty segments.
    pub fn from_path(path: &str) -> Self {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

impl<T> List<T> {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, item: T) { self.items.push(item) }

    pub fn into_vec(self) -> Vec<T> { self.items }

    /// Map a possibly negative position onto an index, `None` if out of range.
    pub fn resolve_index(&self, position: isize) -> Option<usize> {
        let len = self.items.len() as isize;
        let index = if position < 0 { position + len } else { position };
        (0..len).contains(&index).then_some(index as usize)
    }

    /// Element at `position`, counting from the end when negative.
    pub fn get_at(&self, position: isize) -> Option<&T> {
        self.resolve_index(position).map(|i| &self.items[i])
    }

    /// Call-style access without a cast.
    pub fn at(&self, position: isize) -> At<'_, T, T>
    where
        T: Clone,
    {
        self.at_with(position, |raw: &T| Ok::<T, std::convert::Infallible>(raw.clone()))
    }

    /// Call-style access with `cast` applied to a present value.
    pub fn at_with<'a, U, E, F>(&'a self, position: isize, cast: F) -> At<'a, T, U>
    where
        F: FnOnce(&T) -> Result<U, E> + 'a,
        E: fmt::Display,
    {
        At {
            position,
            raw: self.get_at(position),
            cast: Box::new(move |raw: &T| cast(raw).map_err(|e| e.to_string())),
            default: None,
            otherwise: None,
        }
    }
}

impl<T: Clone> List<T> {
    /// Stepped slice with negative bounds, like `items[start:stop:step]`.
    ///
    /// Panics when `step` is zero, as [`Iterator::step_by`] does.
    pub fn slice(&self, start: Option<isize>, stop: Option<isize>, step: isize) -> List<T> {
        assert!(step != 0, "slice step cannot be zero");
        let len = self.items.len() as isize;
        let clamp = |bound: isize| {
            if bound < 0 {
                let shifted = bound + len;
                if shifted < 0 { if step < 0 { -1 } else { 0 } } else { shifted }
            } else if bound >= len {
                if step < 0 { len - 1 } else { len }
            } else {
                bound
            }
        };
        let (mut i, stop) = if step > 0 {
            (start.map_or(0, clamp), stop.map_or(len, clamp))
        } else {
            (start.map_or(len - 1, clamp), stop.map_or(-1, clamp))
        };

        let mut out = Vec::new();
        while (step > 0 && i < stop) || (step < 0 && i > stop) {
            out.push(self.items[i as usize].clone());
            // a step past isize's range leaves the slice in any case
            match i.checked_add(step) {
                Some(next) => i = next,
                None => break,
            }
        }
        List { items: out }
    }

    pub fn reversed(&self) -> List<T> {
        self.slice(None, None, -1)
    }
}

impl<T> Deref for List<T> {
    type Target = [T];

    fn deref(&self) -> &[T] { &self.items }
}

impl<T> DerefMut for List<T> {
    fn deref_mut(&mut self) -> &mut [T] { &mut self.items }
}

impl<T> From<Vec<T>> for List<T> {
    fn from(items: Vec<T>) -> Self { Self { items } }
}

impl<T, const N: usize> From<[T; N]> for List<T> {
    fn from(items: [T; N]) -> Self { Self { items: items.into() } }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { items: iter.into_iter().collect() }
    }
}

impl<T> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter { self.items.into_iter() }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter { self.items.iter() }
}

impl<T> Extend<T> for List<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) { self.items.extend(iter) }
}

/// Fallback used when a position is missing and no default was given.
pub enum Otherwise<'a, U> {
    Value(U),
    /// Invoked only when selected.
    Call(Box<dyn FnOnce() -> U + 'a>),
}

impl<U> Otherwise<'_, U> {
    fn produce(self) -> U {
        match self {
            Otherwise::Value(v) => v,
            Otherwise::Call(f) => f(),
        }
    }
}

impl<U: fmt::Debug> fmt::Debug for Otherwise<'_, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Otherwise::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Otherwise::Call(_) => f.write_str("Call(..)"),
        }
    }
}

/// Pending positional lookup built by [`List::at`] / [`List::at_with`].
#[must_use = "call `resolve` to evaluate the lookup"]
pub struct At<'a, T, U> {
    position: isize,
    raw: Option<&'a T>,
    cast: Box<dyn FnOnce(&T) -> Result<U, String> + 'a>,
    default: Option<Option<U>>,
    otherwise: Option<Otherwise<'a, U>>,
}

impl<'a, T, U> At<'a, T, U> {
    /// Value returned for a missing position. Wins over `otherwise`, even
    /// when it is `None`.
    pub fn default(mut self, value: Option<U>) -> Self {
        self.default = Some(value);
        self
    }

    pub fn otherwise(mut self, value: U) -> Self {
        self.otherwise = Some(Otherwise::Value(value));
        self
    }

    pub fn otherwise_with(mut self, produce: impl FnOnce() -> U + 'a) -> Self {
        self.otherwise = Some(Otherwise::Call(Box::new(produce)));
        self
    }

    pub fn resolve(self) -> Result<Option<U>, BadRequest> {
        let Some(raw) = self.raw else {
            return Ok(match (self.default, self.otherwise) {
                (Some(default), _) => default,
                (None, Some(otherwise)) => Some(otherwise.produce()),
                (None, None) => None,
            });
        };
        let position = self.position;
        (self.cast)(raw).map(Some).map_err(|reason| {
            warn!(position, %reason, "rejecting argument that failed its cast");
            BadRequest::new(format!("invalid argument at position {position}: {reason}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn nums() -> List<i64> { List::from([1, 2, 3]) }

    #[test]
    fn resolve_index_handles_both_ends() {
        let l = nums();
        assert_eq!(l.resolve_index(0), Some(0));
        assert_eq!(l.resolve_index(-3), Some(0));
        assert_eq!(l.resolve_index(3), None);
        assert_eq!(l.resolve_index(-4), None);
        assert_eq!(List::<i64>::new().resolve_index(0), None);
    }

    #[test]
    fn from_path_drops_empty_segments() {
        let args = List::from_path("/blog//show/42/");
        assert_eq!(&args[..], ["blog", "show", "42"]);
        assert!(List::from_path("/").is_empty());
    }

    #[test]
    fn otherwise_producer_is_lazy() {
        let calls = Cell::new(0);
        let l = nums();
        let v = l
            .at(0)
            .otherwise_with(|| {
                calls.set(calls.get() + 1);
                99
            })
            .resolve()
            .expect("present");
        assert_eq!(v, Some(1));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn cast_is_skipped_for_missing_position() {
        let l = List::<String>::new();
        let v = l
            .at_with(0, |_: &String| -> Result<i64, String> { panic!("cast must not run") })
            .default(Some(7))
            .resolve();
        assert_eq!(v, Ok(Some(7)));
    }

    #[test]
    fn cast_failure_message_names_position() {
        let l = List::from(["x".to_string()]);
        let err = l.at_with(0, |s: &String| s.parse::<i64>()).resolve().unwrap_err();
        assert_eq!(err.status(), 400);
        assert!(err.message.starts_with("invalid argument at position 0:"));
    }

    #[test]
    fn slice_follows_python_bounds() {
        let l = List::from([0, 1, 2, 3, 4]);
        assert_eq!(l.slice(Some(1), Some(4), 1).into_vec(), vec![1, 2, 3]);
        assert_eq!(l.slice(None, None, 2).into_vec(), vec![0, 2, 4]);
        assert_eq!(l.slice(Some(-2), None, 1).into_vec(), vec![3, 4]);
        assert_eq!(l.slice(None, None, -1).into_vec(), vec![4, 3, 2, 1, 0]);
        assert_eq!(l.slice(Some(3), Some(0), -1).into_vec(), vec![3, 2, 1]);
        assert_eq!(l.slice(Some(10), Some(-10), -2).into_vec(), vec![4, 2, 0]);
        assert!(l.slice(Some(4), Some(1), 1).is_empty());
        assert!(List::<i64>::new().reversed().is_empty());
    }

    #[test]
    fn slice_with_huge_step_stops_after_first_element() {
        let l = List::from([1, 2]);
        assert_eq!(l.slice(Some(1), None, isize::MAX).into_vec(), vec![2]);
        assert_eq!(l.slice(None, None, isize::MIN).into_vec(), vec![2]);
        assert_eq!(l.slice(Some(0), None, isize::MAX).into_vec(), vec![1]);
    }

    #[test]
    #[should_panic(expected = "slice step cannot be zero")]
    fn zero_step_panics() {
        let _ = nums().slice(None, None, 0);
    }
}
