/* Copyright (c) [2023] [Syswonder Community]
 *   [Ruxos] is licensed under Mulan PSL v2.
 *   You can use this software according to the terms and conditions of the Mulan PSL v2.
 *   You may obtain a copy of Mulan PSL v2 at:
 *               http://license.coscl.org.cn/MulanPSL2
 *   THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND, EITHER EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR PURPOSE.
 *   See the Mulan PSL v2 for more details.
 */

//! Compatible-node lookup in a flat device tree.
//!
//! Backs [`BootEnv::find_compatible`](crate::mp::BootEnv::find_compatible) for
//! kernels that hand the driver their raw DTB.

use fdt_rs::base::DevTree;
use fdt_rs::prelude::*;
use memory_addr::PhysAddr;

/// Returns the first `reg` window of the first node matching `compatible`.
///
/// `reg` is read as an `(address, size)` pair of single u32 cells
/// (`#address-cells = <1>`, `#size-cells = <1>`), which is how the sunxi
/// trees describe both the PRCM and the CPU config blocks.
pub fn find_compatible_region(blob: &[u8], compatible: &str) -> Option<(PhysAddr, usize)> {
    let fdt = unsafe { DevTree::new(blob) }.ok()?;
    let node = fdt.compatible_nodes(compatible).next().ok()??;

    let mut props = node.props();
    while let Ok(Some(prop)) = props.next() {
        if prop.name().ok()? == "reg" {
            let base = prop.u32(0).ok()? as usize;
            let size = prop.u32(1).ok()? as usize;
            return Some((PhysAddr::from(base), size));
        }
    }
    None
}
