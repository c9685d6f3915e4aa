use std::{
    marker::PhantomData,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use base58::ToBase58;
use cdmi_model::{
    Capability, CdmiResource, Container, DataObject, Domain, ObjectId, normalize_path, split_path,
};

use crate::{Membership, ResourceStore, ResourceStores, StoreError, merge_update};

/// Directory holding the object id index of a store, named after the
/// reference layout
const OBJECT_ID_DIR: &str = "cdmi_objectid";

/// A basic file-system-based [ResourceStore] implementation. Each resource
/// is stored inside a root directory as a JSON document named after its
/// (base58-encoded) path, and an `cdmi_objectid/` subdirectory maps object
/// ids back to paths.
#[derive(Clone)]
pub struct FileSystemResourceStore<R>
where
    R: CdmiResource,
{
    root_dir: PathBuf,
    membership: Membership,
    id_prefix: String,
    resource_type: PhantomData<R>,
}

impl<R> FileSystemResourceStore<R>
where
    R: CdmiResource,
{
    /// Creates a new [FileSystemResourceStore] that stores documents in
    /// `root_dir`, sharing the given child index
    pub async fn new<Pathlike>(
        root_dir: Pathlike,
        membership: Membership,
        id_prefix: impl Into<String>,
    ) -> Result<Self, StoreError>
    where
        Pathlike: AsRef<Path>,
    {
        let root_dir = root_dir.as_ref().to_owned();
        tokio::fs::create_dir_all(root_dir.join(OBJECT_ID_DIR))
            .await
            .map_err(|error| StoreError::Backend(format!("{error}")))?;

        Ok(Self {
            root_dir,
            membership,
            id_prefix: id_prefix.into(),
            resource_type: PhantomData,
        })
    }

    fn document_path(&self, path: &str) -> PathBuf {
        self.root_dir.join(path.as_bytes().to_base58())
    }

    fn id_path(&self, id: &ObjectId) -> PathBuf {
        self.root_dir.join(OBJECT_ID_DIR).join(id.as_str())
    }

    async fn read_document(&self, path: &str) -> Result<Option<R>, StoreError> {
        let document = self.document_path(path);
        if !document.exists() {
            return Ok(None);
        }

        let bytes = tokio::fs::read(document)
            .await
            .map_err(|error| StoreError::Backend(format!("{error}")))?;
        let resource = serde_json::from_slice(&bytes)
            .map_err(|error| StoreError::DecodeFailed(format!("{error}")))?;

        Ok(Some(resource))
    }

    async fn write_document(&self, path: &str, resource: &R) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(resource)
            .map_err(|error| StoreError::EncodeFailed(format!("{error}")))?;
        tokio::fs::write(self.document_path(path), bytes)
            .await
            .map_err(|error| StoreError::Backend(format!("{error}")))
    }

    async fn hydrate(&self, path: &str, mut resource: R) -> R {
        resource.set_children(self.membership.children_of(path).await);
        resource
    }
}

#[async_trait]
impl<R> ResourceStore for FileSystemResourceStore<R>
where
    R: CdmiResource,
{
    type Resource = R;

    async fn find_by_path(&self, path: &str) -> Result<Option<R>, StoreError> {
        let path = normalize_path(path);

        match self.read_document(&path).await? {
            Some(resource) => Ok(Some(self.hydrate(&path, resource).await)),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<R>, StoreError> {
        let id_path = self.id_path(id);
        if !id_path.exists() {
            return Ok(None);
        }

        let bytes = tokio::fs::read(id_path)
            .await
            .map_err(|error| StoreError::Backend(format!("{error}")))?;
        let path = String::from_utf8(bytes)
            .map_err(|error| StoreError::DecodeFailed(format!("{error}")))?;

        self.find_by_path(&path).await
    }

    async fn create(&self, path: &str, mut resource: R) -> Result<R, StoreError> {
        let path = normalize_path(path);
        let (parent_uri, name) = split_path(&path);

        let existing_id = self
            .read_document(&path)
            .await?
            .map(|existing| existing.object_id().clone());
        let replacing = existing_id.is_some();
        let id = existing_id.unwrap_or_else(|| ObjectId::generate(&self.id_prefix));

        resource.assign_identity(id.clone(), &name, &parent_uri);

        self.write_document(&path, &resource).await?;
        tokio::fs::write(self.id_path(&id), path.as_bytes())
            .await
            .map_err(|error| StoreError::Backend(format!("{error}")))?;

        if !replacing && path != "/" {
            self.membership.note(&parent_uri, &name).await?;
        }

        Ok(self.hydrate(&path, resource).await)
    }

    async fn update(
        &self,
        path: &str,
        resource: R,
        fields: Option<&[String]>,
    ) -> Result<Option<R>, StoreError> {
        let path = normalize_path(path);

        let Some(existing) = self.read_document(&path).await? else {
            return Ok(None);
        };

        let replacement = merge_update(&existing, resource, &path, fields)?;
        self.write_document(&path, &replacement).await?;

        Ok(Some(self.hydrate(&path, replacement).await))
    }

    async fn delete_by_path(&self, path: &str) -> Result<Option<R>, StoreError> {
        let path = normalize_path(path);
        let (parent_uri, name) = split_path(&path);

        let Some(removed) = self.read_document(&path).await? else {
            return Ok(None);
        };

        tokio::fs::remove_file(self.document_path(&path))
            .await
            .map_err(|error| StoreError::Backend(format!("{error}")))?;

        let id_path = self.id_path(removed.object_id());
        if id_path.exists() {
            tokio::fs::remove_file(id_path)
                .await
                .map_err(|error| StoreError::Backend(format!("{error}")))?;
        }

        self.membership.forget(&parent_uri, &name, &path).await?;

        Ok(Some(removed))
    }
}

/// A file-system-backed [ResourceStores] bundle. Each kind gets its own
/// subdirectory under the data directory, and all four stores share one
/// journaled child index, so the deployment survives restarts.
#[derive(Clone)]
pub struct FileSystemStores {
    containers: FileSystemResourceStore<Container>,
    objects: FileSystemResourceStore<DataObject>,
    domains: FileSystemResourceStore<Domain>,
    capabilities: FileSystemResourceStore<Capability>,
}

impl FileSystemStores {
    /// Open (creating directories as needed) a store bundle rooted at the
    /// given data directory
    pub async fn open<Pathlike>(data_dir: Pathlike, id_prefix: &str) -> Result<Self, StoreError>
    where
        Pathlike: AsRef<Path>,
    {
        let data_dir = data_dir.as_ref();
        tokio::fs::create_dir_all(data_dir)
            .await
            .map_err(|error| StoreError::Backend(format!("{error}")))?;

        let membership = Membership::persistent(data_dir.join("children.json")).await?;

        Ok(Self {
            containers: FileSystemResourceStore::new(
                data_dir.join("container"),
                membership.clone(),
                id_prefix,
            )
            .await?,
            objects: FileSystemResourceStore::new(
                data_dir.join("dataobject"),
                membership.clone(),
                id_prefix,
            )
            .await?,
            domains: FileSystemResourceStore::new(
                data_dir.join("domain"),
                membership.clone(),
                id_prefix,
            )
            .await?,
            capabilities: FileSystemResourceStore::new(
                data_dir.join("capability"),
                membership,
                id_prefix,
            )
            .await?,
        })
    }
}

impl ResourceStores for FileSystemStores {
    type Containers = FileSystemResourceStore<Container>;
    type Objects = FileSystemResourceStore<DataObject>;
    type Domains = FileSystemResourceStore<Domain>;
    type Capabilities = FileSystemResourceStore<Capability>;

    fn containers(&self) -> &Self::Containers {
        &self.containers
    }

    fn data_objects(&self) -> &Self::Objects {
        &self.objects
    }

    fn domains(&self) -> &Self::Domains {
        &self.domains
    }

    fn capabilities(&self) -> &Self::Capabilities {
        &self.capabilities
    }
}
