pub mod util;

#[cfg(test)]
mod domain;
#[cfg(test)]
mod regression;
