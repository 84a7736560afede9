//! End to end formatting through the public API.

mod blocks;
mod hosting;
mod links;
mod safety;
