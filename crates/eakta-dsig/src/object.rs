#![forbid(unsafe_code)]

//! Lookups scoped to the `ds:Object` children of one `ds:Signature`.
//!
//! Objects may carry documents which carry signatures of their own, so a
//! plain descendant search can land in a nested signature.  These helpers
//! only look one level into each direct `ds:Object`.

use eakta_core::ns;
use eakta_xml::find;

type Node<'a> = roxmltree::Node<'a, 'a>;

/// Elements named `local_name` directly inside the signature's own
/// `ds:Object` children, in document order.
pub fn object_content<'a>(signature: Node<'a>, local_name: &str) -> Vec<Node<'a>> {
    find::children(signature, ns::DSIG, ns::node::OBJECT)
        .into_iter()
        .flat_map(|object| find::children_local(object, local_name))
        .collect()
}

/// The `xades:QualifyingProperties` of this signature.
///
/// A candidate whose `Target` names the signature's Id wins.  Otherwise the
/// first candidate without a `Target` is taken; properties targeting some
/// other signature are ignored.
pub fn qualifying_properties<'a>(signature: Node<'a>) -> Option<Node<'a>> {
    let candidates = object_content(signature, ns::node::QUALIFYING_PROPERTIES);
    let own_target = signature
        .attribute(ns::attr::ID)
        .map(|id| format!("#{id}"));

    if let Some(target) = &own_target {
        if let Some(qp) = candidates
            .iter()
            .find(|qp| qp.attribute(ns::attr::TARGET) == Some(target.as_str()))
        {
            return Some(*qp);
        }
    }

    let untargeted = candidates
        .iter()
        .find(|qp| qp.attribute(ns::attr::TARGET).is_none())
        .copied();
    if untargeted.is_none() && !candidates.is_empty() {
        tracing::warn!(
            signature = signature.attribute(ns::attr::ID).unwrap_or(""),
            "QualifyingProperties target another signature; ignored"
        );
    }
    untargeted
}

/// The `xades:SignatureTimeStamp` under this signature's unsigned
/// properties.
pub fn signature_time_stamp<'a>(signature: Node<'a>) -> Option<Node<'a>> {
    qualifying_properties(signature)
        .and_then(|qp| find::child_local(qp, ns::node::UNSIGNED_PROPERTIES))
        .and_then(|up| find::child_local(up, ns::node::UNSIGNED_SIGNATURE_PROPERTIES))
        .and_then(|usp| find::child_local(usp, ns::node::SIGNATURE_TIME_STAMP))
}

/// The `xades:SignedProperties` of this signature.
pub fn signed_properties<'a>(signature: Node<'a>) -> Option<Node<'a>> {
    qualifying_properties(signature)
        .and_then(|qp| find::child_local(qp, ns::node::SIGNED_PROPERTIES))
}
