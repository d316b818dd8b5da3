use std::collections::BTreeMap;

use tracing::debug;

use super::{AirWires, AirWiresBuilder};

/// Computes the air wires of several nets, each independently.
///
/// Nets are keyed by any ordered identifier; a key given twice keeps the
/// result of its last builder.
pub fn build_net_air_wires<K, I>(nets: I) -> BTreeMap<K, AirWires>
where
    K: Ord,
    I: IntoIterator<Item = (K, AirWiresBuilder)>,
{
    let result: BTreeMap<K, AirWires> = nets
        .into_iter()
        .map(|(net, builder)| (net, builder.build_air_wires()))
        .collect();
    debug!(
        nets = result.len(),
        air_wires = result.values().map(Vec::len).sum::<usize>(),
        "built ratsnest"
    );
    result
}
