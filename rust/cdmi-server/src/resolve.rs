use cdmi_model::{
    CdmiResource, Container, DataObject, Domain, ObjectId, ResourceKind, normalize_path,
};
use cdmi_store::{ResourceStore, ResourceStores};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{CdmiError, apply_content_range, select_fields, write_target};

/// A successfully resolved read or write: the concrete kind the ambiguous
/// identifier turned out to denote, and the representation to serve.
///
/// The kind is observable protocol behavior: it decides the media type
/// declared on the response.
#[derive(Debug, Clone)]
pub struct Resolved {
    /// The resource kind the identifier resolved to
    pub kind: ResourceKind,
    /// The (possibly range- and field-reduced) representation to serve
    pub representation: Map<String, Value>,
}

/// Resolves ambiguous CDMI identifiers against the per-kind resource
/// stores.
///
/// Reads probe Container → DataObject → Domain and stop at the first hit;
/// deletes probe DataObject → Container → Domain. Probing is strictly
/// sequential and every store miss is a soft miss - only exhausting the
/// whole chain surfaces as [CdmiError::NotFound]. Writes never probe: the
/// declared content type selects exactly one store.
///
/// Store handles are injected once at construction and shared for the
/// process lifetime; the resolver itself keeps no other state, so
/// concurrent requests need no coordination here.
#[derive(Clone)]
pub struct ResourceResolver<S>
where
    S: ResourceStores,
{
    stores: S,
}

impl<S> ResourceResolver<S>
where
    S: ResourceStores,
{
    /// Create a resolver over the given store bundle
    pub fn new(stores: S) -> Self {
        Self { stores }
    }

    /// The store bundle this resolver probes
    pub fn stores(&self) -> &S {
        &self.stores
    }

    /// Resolve a read by hierarchical path through the fixed fallback
    /// order, applying the byte-range directive (data objects only) and
    /// the field/range query to the resolved representation.
    pub async fn read_by_path(
        &self,
        path: &str,
        range: Option<&str>,
        fields: Option<&[String]>,
    ) -> Result<Resolved, CdmiError> {
        let path = normalize_path(path);
        debug!(%path, "resolving read by path");

        if let Some(container) = self.stores.containers().find_by_path(&path).await? {
            return finish(ResourceKind::Container, container.to_representation()?, fields);
        }

        if let Some(object) = self.stores.data_objects().find_by_path(&path).await? {
            return finish_object(object, range, fields);
        }

        if let Some(domain) = self.stores.domains().find_by_path(&path).await? {
            return finish(ResourceKind::Domain, domain.to_representation()?, fields);
        }

        Err(CdmiError::NotFound)
    }

    /// Resolve a read by object id through the same fallback order as
    /// [ResourceResolver::read_by_path]
    pub async fn read_by_id(
        &self,
        id: &ObjectId,
        range: Option<&str>,
        fields: Option<&[String]>,
    ) -> Result<Resolved, CdmiError> {
        debug!(%id, "resolving read by object id");

        if let Some(container) = self.stores.containers().find_by_id(id).await? {
            return finish(ResourceKind::Container, container.to_representation()?, fields);
        }

        if let Some(object) = self.stores.data_objects().find_by_id(id).await? {
            return finish_object(object, range, fields);
        }

        if let Some(domain) = self.stores.domains().find_by_id(id).await? {
            return finish(ResourceKind::Domain, domain.to_representation()?, fields);
        }

        Err(CdmiError::NotFound)
    }

    /// Resolve a domain-only read; no fallback across kinds
    pub async fn read_domain(
        &self,
        path: &str,
        fields: Option<&[String]>,
    ) -> Result<Resolved, CdmiError> {
        let path = normalize_path(path);
        debug!(%path, "resolving domain read");

        let domain = self
            .stores
            .domains()
            .find_by_path(&path)
            .await?
            .ok_or(CdmiError::NotFound)?;

        finish(ResourceKind::Domain, domain.to_representation()?, fields)
    }

    /// Resolve a capability-only read; no fallback across kinds
    pub async fn read_capability(
        &self,
        path: &str,
        fields: Option<&[String]>,
    ) -> Result<Resolved, CdmiError> {
        let path = normalize_path(path);
        debug!(%path, "resolving capability read");

        let capability = self
            .stores
            .capabilities()
            .find_by_path(&path)
            .await?
            .ok_or(CdmiError::NotFound)?;

        finish(ResourceKind::Capability, capability.to_representation()?, fields)
    }

    /// Resolve a write: the declared content type selects exactly one
    /// store, the body is decoded into that kind, and the full stored
    /// representation comes back.
    ///
    /// A domain write carrying a field query is a field-scoped update of
    /// an existing domain rather than a create.
    pub async fn write(
        &self,
        path: &str,
        declared_type: &str,
        body: &[u8],
        fields: Option<&[String]>,
    ) -> Result<Resolved, CdmiError> {
        let path = normalize_path(path);
        let kind = write_target(declared_type)?;
        debug!(%path, %kind, "resolving write");

        let source: Map<String, Value> =
            serde_json::from_slice(body).map_err(|_| CdmiError::BadRequest)?;

        let representation = match kind {
            ResourceKind::Container => {
                let container =
                    Container::from_representation(&source).map_err(|_| CdmiError::BadRequest)?;
                self.stores
                    .containers()
                    .create(&path, container)
                    .await?
                    .to_representation()?
            }
            ResourceKind::DataObject => {
                let object = match source.get("copy").and_then(Value::as_str) {
                    Some(copy_source) => {
                        self.stores
                            .data_objects()
                            .find_by_path(&normalize_path(copy_source))
                            .await?
                            .ok_or(CdmiError::BadCopySource)?
                    }
                    None => DataObject::from_representation(&source)
                        .map_err(|_| CdmiError::BadRequest)?,
                };

                self.stores
                    .data_objects()
                    .create(&path, object)
                    .await?
                    .to_representation()?
            }
            ResourceKind::Domain => {
                let domain =
                    Domain::from_representation(&source).map_err(|_| CdmiError::BadRequest)?;

                let stored = match fields {
                    Some(fields) => self
                        .stores
                        .domains()
                        .update(&path, domain, Some(fields))
                        .await?
                        .ok_or(CdmiError::NotFound)?,
                    None => self.stores.domains().create(&path, domain).await?,
                };

                stored.to_representation()?
            }
            ResourceKind::Capability => return Err(CdmiError::BadContentType),
        };

        Ok(Resolved {
            kind,
            representation,
        })
    }

    /// Resolve a delete through the delete fallback order, removing the
    /// first match. The order deliberately differs from reads: deletions
    /// favor payload-bearing resources.
    pub async fn delete(&self, path: &str) -> Result<ResourceKind, CdmiError> {
        let path = normalize_path(path);
        debug!(%path, "resolving delete");

        if self
            .stores
            .data_objects()
            .delete_by_path(&path)
            .await?
            .is_some()
        {
            return Ok(ResourceKind::DataObject);
        }

        if self
            .stores
            .containers()
            .delete_by_path(&path)
            .await?
            .is_some()
        {
            return Ok(ResourceKind::Container);
        }

        if self.stores.domains().delete_by_path(&path).await?.is_some() {
            return Ok(ResourceKind::Domain);
        }

        Err(CdmiError::NotFound)
    }
}

fn finish(
    kind: ResourceKind,
    representation: Map<String, Value>,
    fields: Option<&[String]>,
) -> Result<Resolved, CdmiError> {
    let representation = match fields {
        Some(fields) => select_fields(&representation, fields)?,
        None => representation,
    };

    Ok(Resolved {
        kind,
        representation,
    })
}

fn finish_object(
    object: DataObject,
    range: Option<&str>,
    fields: Option<&[String]>,
) -> Result<Resolved, CdmiError> {
    let mut representation = object.to_representation()?;

    if let Some(range) = range {
        apply_content_range(&mut representation, range)?;
    }

    finish(ResourceKind::DataObject, representation, fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use cdmi_store::MemoryStores;

    fn resolver() -> ResourceResolver<MemoryStores> {
        ResourceResolver::new(MemoryStores::new())
    }

    async fn put_object(
        resolver: &ResourceResolver<MemoryStores>,
        path: &str,
        body: &str,
    ) -> Result<Resolved> {
        Ok(resolver
            .write(path, "application/cdmi-object", body.as_bytes(), None)
            .await?)
    }

    #[tokio::test]
    async fn it_resolves_reads_in_fixed_fallback_order() -> Result<()> {
        let resolver = resolver();

        // The same path string deliberately denotes a resource in every
        // store; the container must win, deterministically.
        resolver
            .stores()
            .containers()
            .create("/shared", Container::default())
            .await?;
        resolver
            .stores()
            .data_objects()
            .create("/shared", DataObject::default())
            .await?;
        resolver
            .stores()
            .domains()
            .create("/shared", Domain::default())
            .await?;

        for _ in 0..3 {
            let resolved = resolver.read_by_path("/shared", None, None).await?;
            assert_eq!(resolved.kind, ResourceKind::Container);
        }

        Ok(())
    }

    #[tokio::test]
    async fn it_falls_back_to_data_objects_and_domains() -> Result<()> {
        let resolver = resolver();

        resolver
            .stores()
            .data_objects()
            .create("/payload", DataObject::default())
            .await?;
        resolver
            .stores()
            .domains()
            .create("/cdmi_domains/admin", Domain::default())
            .await?;

        let object = resolver.read_by_path("/payload", None, None).await?;
        assert_eq!(object.kind, ResourceKind::DataObject);

        let domain = resolver.read_by_path("/cdmi_domains/admin", None, None).await?;
        assert_eq!(domain.kind, ResourceKind::Domain);

        assert!(matches!(
            resolver.read_by_path("/missing", None, None).await,
            Err(CdmiError::NotFound)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn it_resolves_by_object_id_through_the_same_order() -> Result<()> {
        let resolver = resolver();

        let stored = resolver
            .stores()
            .data_objects()
            .create("/note", DataObject::default())
            .await?;

        let resolved = resolver.read_by_id(&stored.object_id, None, None).await?;
        assert_eq!(resolved.kind, ResourceKind::DataObject);

        assert!(matches!(
            resolver
                .read_by_id(&ObjectId::from("unknown"), None, None)
                .await,
            Err(CdmiError::NotFound)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn it_compounds_byte_range_and_value_range() -> Result<()> {
        let resolver = resolver();
        put_object(&resolver, "/song", r#"{"value": "do re mi fa"}"#).await?;

        // The Range directive limits the payload first; the field query
        // then operates on the already-limited payload.
        let fields = vec!["value:0-1".to_string()];
        let resolved = resolver
            .read_by_path("/song", Some("3-7"), Some(&fields))
            .await?;

        assert_eq!(
            resolved.representation.get("value"),
            Some(&Value::String("re".to_string()))
        );

        Ok(())
    }

    #[tokio::test]
    async fn it_rejects_unknown_write_media_types() -> Result<()> {
        let resolver = resolver();

        let result = resolver
            .write("/foo", "application/cdmi-widget", b"{}", None)
            .await;
        assert!(matches!(result, Err(CdmiError::BadContentType)));

        let result = resolver
            .write("/foo", "application/cdmi-capability", b"{}", None)
            .await;
        assert!(matches!(result, Err(CdmiError::BadContentType)));

        Ok(())
    }

    #[tokio::test]
    async fn it_rejects_unreadable_write_bodies() -> Result<()> {
        let resolver = resolver();

        let result = resolver
            .write("/foo", "application/cdmi-object", b"not json", None)
            .await;
        assert!(matches!(result, Err(CdmiError::BadRequest)));

        Ok(())
    }

    #[tokio::test]
    async fn it_creates_data_objects_by_copy() -> Result<()> {
        let resolver = resolver();
        put_object(
            &resolver,
            "/original",
            r#"{"value": "payload", "metadata": {"color": "blue"}}"#,
        )
        .await?;

        let copied = resolver
            .write(
                "/duplicate",
                "application/cdmi-object",
                br#"{"copy": "/original"}"#,
                None,
            )
            .await?;

        assert_eq!(
            copied.representation.get("value"),
            Some(&Value::String("payload".to_string()))
        );

        let original = resolver.read_by_path("/original", None, None).await?;
        assert_ne!(
            copied.representation.get("objectID"),
            original.representation.get("objectID")
        );

        let dangling = resolver
            .write(
                "/broken",
                "application/cdmi-object",
                br#"{"copy": "/nowhere"}"#,
                None,
            )
            .await;
        assert!(matches!(dangling, Err(CdmiError::BadCopySource)));

        Ok(())
    }

    #[tokio::test]
    async fn it_updates_domains_field_scoped() -> Result<()> {
        let resolver = resolver();

        resolver
            .write(
                "/cdmi_domains/home",
                "application/cdmi-domain",
                br#"{"metadata": {"owner": "a", "quota": "10"}}"#,
                None,
            )
            .await?;

        let fields = vec!["metadata".to_string()];
        let updated = resolver
            .write(
                "/cdmi_domains/home",
                "application/cdmi-domain",
                br#"{"metadata": {"owner": "b"}}"#,
                Some(&fields),
            )
            .await?;

        let metadata = updated
            .representation
            .get("metadata")
            .and_then(Value::as_object)
            .expect("metadata survives the update");
        assert_eq!(metadata.get("owner"), Some(&Value::String("b".into())));

        // A field-scoped update of an absent domain is not a create.
        let missing = resolver
            .write(
                "/cdmi_domains/nowhere",
                "application/cdmi-domain",
                br#"{"metadata": {}}"#,
                Some(&fields),
            )
            .await;
        assert!(matches!(missing, Err(CdmiError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn it_deletes_payload_bearing_resources_first() -> Result<()> {
        let resolver = resolver();

        resolver
            .stores()
            .containers()
            .create("/shared", Container::default())
            .await?;
        resolver
            .stores()
            .data_objects()
            .create("/shared", DataObject::default())
            .await?;

        assert_eq!(resolver.delete("/shared").await?, ResourceKind::DataObject);
        assert_eq!(resolver.delete("/shared").await?, ResourceKind::Container);
        assert!(matches!(
            resolver.delete("/shared").await,
            Err(CdmiError::NotFound)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn it_serves_the_resolved_kind_as_media_type() -> Result<()> {
        let resolver = resolver();

        resolver
            .stores()
            .containers()
            .create("/box", Container::default())
            .await?;

        let resolved = resolver.read_by_path("/box", None, None).await?;
        assert_eq!(resolved.kind.media_type(), "application/cdmi-container+json");

        Ok(())
    }
}
