/*
 *  display/mod.rs
 *
 *  SevSegS - scales and tails
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display subsystem - builds the segment topology and owns all visual state
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

// The engine proper
pub mod engine;

// Re-exports for convenience
pub use engine::{DisplayError, SegmentDisplay};
