//! Property service.
//!
//! Properties are the root of the ownership chain. Deleting one removes
//! everything beneath it in a single transaction.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use domain::{Image, NewProperty, Property, PropertyChanges, PropertyView, Requester, ResourceRef};

use super::access::{require_manager, AccessResolver};
use crate::config::{ALLOWED_IMAGE_TYPES, MAX_IMAGES_PER_UPLOAD, PROPERTY_IMAGE_FOLDER};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{FileStorage, KeyedLocks, StoredFile, UnitOfWork, Upload};
use crate::types::{PropertyFilter, RoomFilter, TenantFilter};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PropertyService: Send + Sync {
    /// Owners only ever see their own properties
    async fn list(&self, requester: Requester, filter: PropertyFilter) -> AppResult<Vec<PropertyView>>;

    async fn get(&self, requester: Requester, id: Uuid) -> AppResult<PropertyView>;

    async fn create(&self, requester: Requester, input: NewProperty) -> AppResult<PropertyView>;

    async fn update(&self, requester: Requester, id: Uuid, changes: PropertyChanges) -> AppResult<PropertyView>;

    /// Cascade-delete a property without residents
    async fn delete(&self, requester: Requester, id: Uuid) -> AppResult<()>;

    /// Store uploaded images and append them to the property
    async fn add_images(&self, requester: Requester, id: Uuid, uploads: Vec<Upload>) -> AppResult<PropertyView>;
}

pub struct PropertyManager<U: UnitOfWork> {
    uow: Arc<U>,
    access: AccessResolver<U>,
    locks: Arc<KeyedLocks>,
    storage: Arc<dyn FileStorage>,
    max_upload_bytes: usize,
}

impl<U: UnitOfWork> PropertyManager<U> {
    pub fn new(
        uow: Arc<U>,
        locks: Arc<KeyedLocks>,
        storage: Arc<dyn FileStorage>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            access: AccessResolver::new(uow.clone()),
            uow,
            locks,
            storage,
            max_upload_bytes,
        }
    }

    fn check_uploads(&self, uploads: &[Upload]) -> AppResult<()> {
        if uploads.is_empty() {
            return Err(AppError::validation("Please upload at least one image"));
        }
        if uploads.len() > MAX_IMAGES_PER_UPLOAD {
            return Err(AppError::validation(format!(
                "At most {} images can be uploaded at once",
                MAX_IMAGES_PER_UPLOAD
            )));
        }
        for upload in uploads {
            if !ALLOWED_IMAGE_TYPES.contains(&upload.content_type.as_str()) {
                return Err(AppError::validation(format!(
                    "Unsupported file type '{}'. Only JPEG, PNG and WebP images are allowed",
                    upload.content_type
                )));
            }
            if upload.bytes.len() > self.max_upload_bytes {
                return Err(AppError::validation(format!(
                    "Each image must be at most {} bytes",
                    self.max_upload_bytes
                )));
            }
        }
        Ok(())
    }

    /// Best-effort removal of stored assets.
    async fn discard(&self, public_ids: impl IntoIterator<Item = String>) {
        for public_id in public_ids {
            if let Err(e) = self.storage.delete(&public_id).await {
                tracing::warn!(public_id = %public_id, error = %e, "Failed to delete stored file");
            }
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> PropertyService for PropertyManager<U> {
    async fn list(&self, requester: Requester, mut filter: PropertyFilter) -> AppResult<Vec<PropertyView>> {
        if !requester.is_admin() && requester.is_manager() {
            filter.owner = Some(requester.id);
        }
        let properties = self.uow.properties().list(filter).await?;
        Ok(properties.into_iter().map(PropertyView::from).collect())
    }

    async fn get(&self, requester: Requester, id: Uuid) -> AppResult<PropertyView> {
        self.access
            .authorize(&requester, ResourceRef::Property(id))
            .await?;
        let property = self
            .uow
            .properties()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Property")?;
        Ok(property.into())
    }

    async fn create(&self, requester: Requester, input: NewProperty) -> AppResult<PropertyView> {
        require_manager(&requester)?;

        let property = Property::create(requester.id, input, Utc::now());
        let property = self.uow.properties().insert(property).await?;

        tracing::info!(property_id = %property.id, owner_id = %requester.id, "Property created");
        Ok(property.into())
    }

    async fn update(&self, requester: Requester, id: Uuid, changes: PropertyChanges) -> AppResult<PropertyView> {
        self.access
            .authorize(&requester, ResourceRef::Property(id))
            .await?;

        let mut property = self
            .uow
            .properties()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Property")?;
        property.apply(changes, Utc::now());

        Ok(self.uow.properties().update(property).await?.into())
    }

    async fn delete(&self, requester: Requester, id: Uuid) -> AppResult<()> {
        self.access
            .authorize(&requester, ResourceRef::Property(id))
            .await?;
        let _property = self.locks.lock(&KeyedLocks::property_key(id)).await;
        // Placements only hold their room's key
        let room_keys: Vec<String> = self
            .uow
            .rooms()
            .list(RoomFilter {
                property: Some(id),
                ..Default::default()
            })
            .await?
            .iter()
            .map(|room| KeyedLocks::room_key(room.id))
            .collect();
        let _rooms = self.locks.lock_all(&room_keys).await;

        let images = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let property = ctx
                        .properties()
                        .find_by_id(id)
                        .await?
                        .ok_or_not_found("Property")?;

                    let residents = ctx.tenants().count_residents_in_property(id).await?;
                    if residents > 0 {
                        return Err(AppError::conflict(format!(
                            "Cannot delete property with {} tenant(s) still living in it",
                            residents
                        )));
                    }

                    let tenants = ctx
                        .tenants()
                        .list(TenantFilter {
                            property: Some(id),
                            ..Default::default()
                        })
                        .await?;
                    for tenant in &tenants {
                        ctx.payments().delete_by_tenant(tenant.id).await?;
                        ctx.complaints().delete_by_tenant(tenant.id).await?;
                    }
                    ctx.payments().delete_by_property(id).await?;
                    ctx.complaints().delete_by_property(id).await?;
                    ctx.tenants().delete_by_property(id).await?;
                    let rooms = ctx.rooms().delete_by_property(id).await?;
                    let notices = ctx.notices().delete_by_property(id).await?;
                    ctx.properties().delete(id).await?;

                    tracing::info!(
                        property_id = %id,
                        tenants = tenants.len(),
                        rooms,
                        notices,
                        "Property deleted with its records"
                    );
                    Ok(property.images)
                })
            })
            .await?;

        self.discard(images.into_iter().filter_map(|image| image.public_id))
            .await;
        Ok(())
    }

    async fn add_images(&self, requester: Requester, id: Uuid, uploads: Vec<Upload>) -> AppResult<PropertyView> {
        self.access
            .authorize(&requester, ResourceRef::Property(id))
            .await?;
        self.check_uploads(&uploads)?;

        let mut stored: Vec<StoredFile> = Vec::with_capacity(uploads.len());
        for upload in uploads {
            match self.storage.store(PROPERTY_IMAGE_FOLDER, upload).await {
                Ok(file) => stored.push(file),
                Err(e) => {
                    self.discard(stored.into_iter().map(|file| file.public_id))
                        .await;
                    return Err(e);
                }
            }
        }

        let images: Vec<Image> = stored
            .iter()
            .map(|file| Image {
                url: file.url.clone(),
                public_id: Some(file.public_id.clone()),
                caption: None,
            })
            .collect();

        let saved = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let mut property = ctx
                        .properties()
                        .find_by_id(id)
                        .await?
                        .ok_or_not_found("Property")?;
                    property.images.extend(images);
                    property.updated_at = Utc::now();
                    ctx.properties().update(property).await
                })
            })
            .await;

        match saved {
            Ok(property) => Ok(property.into()),
            Err(e) => {
                self.discard(stored.into_iter().map(|file| file.public_id))
                    .await;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MAX_UPLOAD_BYTES;
    use crate::infra::{MockFileStorage, MockUnitOfWork};
    use domain::{
        Address, Contact, NewRoom, PropertyAmenities, PropertyType, Room, RoomType, UserRole,
    };

    fn new_property() -> NewProperty {
        NewProperty {
            name: "Green Nest".to_string(),
            property_type: PropertyType::Girls,
            address: Address {
                street: "22 Park Street".to_string(),
                city: "Kolkata".to_string(),
                state: "West Bengal".to_string(),
                pincode: "700016".to_string(),
                landmark: None,
            },
            contact: Contact {
                person_name: "Mita".to_string(),
                phone: "9830012345".to_string(),
                email: None,
            },
            amenities: PropertyAmenities::default(),
            description: None,
            rules: None,
            status: None,
        }
    }

    fn manager(uow: MockUnitOfWork, storage: MockFileStorage) -> PropertyManager<MockUnitOfWork> {
        PropertyManager::new(
            Arc::new(uow),
            Arc::new(KeyedLocks::new()),
            Arc::new(storage),
            DEFAULT_MAX_UPLOAD_BYTES,
        )
    }

    #[tokio::test]
    async fn test_owner_listing_is_scoped_to_owner() {
        let owner = Requester::new(Uuid::new_v4(), UserRole::Owner);
        let mut uow = MockUnitOfWork::new();
        uow.properties
            .expect_list()
            .withf(move |filter| filter.owner == Some(owner.id))
            .returning(|_| Ok(Vec::new()));

        let listed = manager(uow, MockFileStorage::new())
            .list(owner, PropertyFilter::owned_by(Uuid::new_v4()))
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_tenant_cannot_create_property() {
        let tenant = Requester::new(Uuid::new_v4(), UserRole::Tenant);
        let result = manager(MockUnitOfWork::new(), MockFileStorage::new())
            .create(tenant, new_property())
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_stamps_owner() {
        let owner = Requester::new(Uuid::new_v4(), UserRole::Owner);
        let mut uow = MockUnitOfWork::new();
        uow.properties.expect_insert().returning(Ok);

        let view = manager(uow, MockFileStorage::new())
            .create(owner, new_property())
            .await
            .unwrap();
        assert_eq!(view.property.owner_id, owner.id);
        assert_eq!(view.occupancy_percentage, 0);
    }

    #[tokio::test]
    async fn test_delete_refused_while_residents_remain() {
        let owner = Requester::new(Uuid::new_v4(), UserRole::Owner);
        let property = Property::create(owner.id, new_property(), Utc::now());
        let id = property.id;

        let mut uow = MockUnitOfWork::new();
        uow.properties
            .expect_find_by_id()
            .returning(move |_| Ok(Some(property.clone())));
        uow.rooms.expect_list().returning(|_| Ok(Vec::new()));
        uow.tenants
            .expect_count_residents_in_property()
            .returning(|_| Ok(2));
        uow.properties.expect_delete().never();

        let result = manager(uow, MockFileStorage::new()).delete(owner, id).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_delete_waits_for_placements_in_its_rooms() {
        let owner = Requester::new(Uuid::new_v4(), UserRole::Owner);
        let property = Property::create(owner.id, new_property(), Utc::now());
        let id = property.id;
        let room = Room::create(
            NewRoom {
                property_id: id,
                room_number: "12".to_string(),
                floor: 1,
                room_type: RoomType::Double,
                capacity: 2,
                rent: 7000,
                security_deposit: 0,
                area: None,
                furnishing: Default::default(),
                amenities: Default::default(),
                status: None,
                images: Vec::new(),
                description: None,
            },
            Utc::now(),
        )
        .unwrap();
        let room_key = KeyedLocks::room_key(room.id);

        let mut uow = MockUnitOfWork::new();
        uow.properties
            .expect_find_by_id()
            .returning(move |_| Ok(Some(property.clone())));
        uow.rooms
            .expect_list()
            .withf(move |filter| filter.property == Some(id))
            .returning(move |_| Ok(vec![room.clone()]));
        uow.tenants
            .expect_count_residents_in_property()
            .returning(|_| Ok(1));

        let locks = Arc::new(KeyedLocks::new());
        let properties = Arc::new(PropertyManager::new(
            Arc::new(uow),
            locks.clone(),
            Arc::new(MockFileStorage::new()),
            DEFAULT_MAX_UPLOAD_BYTES,
        ));

        // A placement is in flight in one of the rooms
        let placement = locks.lock(&room_key).await;
        let pending = tokio::spawn({
            let properties = properties.clone();
            async move { properties.delete(owner, id).await }
        });
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(!pending.is_finished());

        drop(placement);
        let result = pending.await.unwrap();
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_rejects_non_image_upload_before_storing() {
        let owner = Requester::new(Uuid::new_v4(), UserRole::Owner);
        let property = Property::create(owner.id, new_property(), Utc::now());
        let id = property.id;

        let mut uow = MockUnitOfWork::new();
        uow.properties
            .expect_find_by_id()
            .returning(move |_| Ok(Some(property.clone())));
        let mut storage = MockFileStorage::new();
        storage.expect_store().never();

        let result = manager(uow, storage)
            .add_images(
                owner,
                id,
                vec![Upload {
                    content_type: "application/pdf".to_string(),
                    bytes: vec![1, 2, 3],
                }],
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
