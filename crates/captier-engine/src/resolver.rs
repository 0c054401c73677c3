//! Launch template resolution.
//!
//! A group references its template either directly or through a
//! mixed-instances policy. Both paths can be missing links in real
//! provider data, so resolution is an exhaustive match returning a typed
//! failure rather than a dereference that can panic.

use captier_core::{AutoScalingGroup, CapacityError, CapacityResult, TemplateRef};

/// Return the launch template name associated with a group.
///
/// Fails with [`CapacityError::MissingTemplateReference`] when the record
/// carries no usable reference anywhere.
pub fn resolve_template(group: &AutoScalingGroup) -> CapacityResult<&str> {
    match &group.template {
        TemplateRef::Direct { name } => Ok(name.as_str()),
        TemplateRef::MixedInstances { policy } => policy
            .launch_template
            .as_ref()
            .and_then(|spec| spec.launch_template_name.as_deref())
            .ok_or_else(|| CapacityError::MissingTemplateReference(group.name.clone())),
        TemplateRef::Absent => Err(CapacityError::MissingTemplateReference(group.name.clone())),
    }
}
