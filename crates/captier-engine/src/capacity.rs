//! Free-address capacity aggregation.

use captier_core::{CapacityResult, CapacitySource, SubnetId};

/// Sum the available addresses across a group's subnets.
///
/// An empty subnet list scores 0. A failed lookup aborts the whole sum:
/// the caller excludes the group from the cycle instead of publishing a
/// silently under-counted score.
pub async fn aggregate_capacity(
    source: &dyn CapacitySource,
    subnet_ids: &[SubnetId],
) -> CapacityResult<u64> {
    let mut total = 0u64;
    for id in subnet_ids {
        let subnet = source.describe_subnet(id).await?;
        total += subnet.available_addresses;
    }
    Ok(total)
}
