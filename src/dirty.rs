use std::cell::Cell;
use std::ops;


// A value plus a "changed since last checked" flag, so that front-ends can redraw only when
// something actually changed.
#[derive(Clone, Debug)]
pub struct Dirty<T> {
    value: T,
    dirty: Cell<bool>,
}

impl<T> Dirty<T> {
    // Starts clean.
    pub fn new(value: T) -> Self { Self { value, dirty: Cell::new(false) } }

    pub fn take_dirt(&self) -> bool { self.dirty.replace(false) }
}

impl<T: PartialEq> Dirty<T> {
    // Stores `value` and returns the previous one. Only an actual change raises the flag.
    pub fn replace(&mut self, value: T) -> T {
        if self.value != value {
            self.dirty.set(true);
        }
        std::mem::replace(&mut self.value, value)
    }
}

impl<T> ops::Deref for Dirty<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target { &self.value }
}
// No `DerefMut`: every mutation must go through `replace` to keep the flag honest.


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_changes_raise_the_flag() {
        let mut value = Dirty::new(1);
        assert!(!value.take_dirt());
        assert_eq!(value.replace(1), 1);
        assert!(!value.take_dirt());
        assert_eq!(value.replace(2), 1);
        assert_eq!(*value, 2);
        assert!(value.take_dirt());
        assert!(!value.take_dirt());
    }
}
