//! The number accumulator.
//!
//! Digits stream in one byte at a time and accumulate into fixed-width
//! components (integer, fraction, exponent). The moment any component would
//! pass `i64::MAX`, the textual prefix seen so far is materialized into
//! `big` and every later byte appends there, preserving the literal form.

use alloc::string::String;
use core::fmt::Write;

use crate::value::Value;

const MAX_SAFE: u64 = i64::MAX as u64;

#[derive(Debug)]
pub(crate) struct Number {
    neg: bool,
    i: u64,
    frac: u64,
    div: f64,
    frac_digits: u32,
    neg_exp: bool,
    exp: u64,
    big: String,
}

impl Default for Number {
    fn default() -> Self {
        Self {
            neg: false,
            i: 0,
            frac: 0,
            div: 1.0,
            frac_digits: 0,
            neg_exp: false,
            exp: 0,
            big: String::new(),
        }
    }
}

impl Number {
    /// Clears all components. `big` keeps its capacity.
    pub fn reset(&mut self) {
        self.neg = false;
        self.i = 0;
        self.frac = 0;
        self.div = 1.0;
        self.frac_digits = 0;
        self.neg_exp = false;
        self.exp = 0;
        self.big.clear();
    }

    pub fn set_neg(&mut self) {
        self.neg = true;
    }

    pub fn set_neg_exp(&mut self) {
        self.neg_exp = true;
    }

    pub fn is_big(&self) -> bool {
        !self.big.is_empty()
    }

    /// Appends a raw literal byte after promotion (`.`, `e`, signs).
    pub fn push_big(&mut self, b: u8) {
        self.big.push(b as char);
    }

    pub fn add_digit(&mut self, b: u8) {
        if !self.big.is_empty() {
            self.big.push(b as char);
            return;
        }
        let d = u64::from(b - b'0');
        match self.i.checked_mul(10).and_then(|v| v.checked_add(d)) {
            Some(v) if v <= MAX_SAFE => self.i = v,
            _ => {
                self.fill_big();
                self.big.push(b as char);
            }
        }
    }

    pub fn add_frac(&mut self, b: u8) {
        if !self.big.is_empty() {
            self.big.push(b as char);
            return;
        }
        let d = u64::from(b - b'0');
        match self.frac.checked_mul(10).and_then(|v| v.checked_add(d)) {
            Some(v) if v <= MAX_SAFE => {
                self.frac = v;
                self.div *= 10.0;
                self.frac_digits += 1;
            }
            _ => {
                self.fill_big();
                self.big.push(b as char);
            }
        }
    }

    pub fn add_exp(&mut self, b: u8) {
        if !self.big.is_empty() {
            self.big.push(b as char);
            return;
        }
        let d = u64::from(b - b'0');
        match self.exp.checked_mul(10).and_then(|v| v.checked_add(d)) {
            Some(v) if v <= MAX_SAFE => self.exp = v,
            _ => {
                self.fill_big();
                self.big.push(b as char);
            }
        }
    }

    /// Writes the textual form of the fixed-width components into `big` so
    /// that appending subsequent raw bytes reproduces the original literal.
    fn fill_big(&mut self) {
        self.big.clear();
        if self.neg {
            self.big.push('-');
        }
        let _ = write!(self.big, "{}", self.i);
        if self.frac_digits > 0 {
            self.big.push('.');
            let width = self.frac_digits as usize;
            let _ = write!(self.big, "{:0width$}", self.frac, width = width);
        }
        if self.exp > 0 {
            self.big.push('e');
            if self.neg_exp {
                self.big.push('-');
            }
            let _ = write!(self.big, "{}", self.exp);
        }
    }

    /// Finalizes the accumulated number into a typed [`Value`].
    ///
    /// Integers with no decimal point and no exponent stay [`Value::Int`];
    /// decimal and exponent forms become [`Value::Float`] unless the result
    /// overflows to infinity or underflows a nonzero mantissa to zero, in
    /// which case the literal is preserved as [`Value::Big`].
    pub fn as_value(&mut self) -> Value {
        if !self.big.is_empty() {
            return self.take_big();
        }
        if self.frac_digits == 0 && self.exp == 0 {
            let i = self.i as i64;
            return Value::Int(if self.neg { -i } else { i });
        }
        let mut f = self.i as f64;
        if self.frac > 0 {
            f += self.frac as f64 / self.div;
        }
        if self.neg {
            f = -f;
        }
        if self.exp > 0 {
            if self.neg_exp {
                // Divide in steps that stay finite so subnormal results
                // survive instead of collapsing through division by infinity.
                let mut e = self.exp;
                while e > 0 && f != 0.0 {
                    let step = e.min(308);
                    f /= pow10(step);
                    e -= step;
                }
            } else {
                f *= pow10(self.exp);
            }
        }
        if f.is_infinite() || (f == 0.0 && (self.i > 0 || self.frac > 0)) {
            self.fill_big();
            return self.take_big();
        }
        Value::Float(f)
    }

    fn take_big(&mut self) -> Value {
        let text = self.big.clone();
        self.big.clear();
        Value::Big(text)
    }
}

/// `10^e` as an `f64`, saturating to infinity past the representable range.
fn pow10(mut e: u64) -> f64 {
    let mut p = 1.0f64;
    while e > 0 && p.is_finite() {
        p *= 10.0;
        e -= 1;
    }
    p
}
