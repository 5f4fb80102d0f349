mod parse_bad;

#[cfg(feature = "std")]
mod property_partition;
#[cfg(feature = "std")]
mod util;
