// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/// Returns the page index of the given address. Each memory page for the
/// 6502 is 256 (FF) bytes in size and is relevant because some instructions
/// need extra cycles to use addresses in different pages.
#[inline(always)]
pub fn page(addr: u16) -> u8 {
    (addr >> 8) as u8
}

/// Determine if there was a page cross between the addresses. The direction
/// of the cross doesn't matter to any instruction, only that the high bytes
/// differ.
#[inline(always)]
pub fn page_crossed(addr1: u16, addr2: u16) -> bool {
    page(addr1) != page(addr2)
}
