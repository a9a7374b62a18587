#[cfg(test)]
mod macros;

#[cfg(test)]
pub(crate) use self::macros::each_capacity;
