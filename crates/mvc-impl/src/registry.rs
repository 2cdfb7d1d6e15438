//! 容器构建器实现

use async_trait::async_trait;
use mvc_abstractions::{BuildWarning, ComponentRegistry, RegistryBuilder, RegistryEntry};
use mvc_common::{
    ComponentDefinition, ComponentKind, DefinitionCatalog, RegistryError, RegistryResult,
    SharedInstance,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 基于定义目录的容器构建器
///
/// 逐个解析候选限定名称并按分类标记实例化、登记：
/// 处理器以简单名称首字母小写登记，服务以显式名称或逐能力登记。
/// 任一候选无法解析或实例化即中止整个构建。
pub struct CatalogRegistryBuilder {
    catalog: Arc<DefinitionCatalog>,
}

impl CatalogRegistryBuilder {
    /// 创建新的容器构建器
    pub fn new(catalog: Arc<DefinitionCatalog>) -> Self {
        Self { catalog }
    }

    fn construct(definition: &ComponentDefinition) -> RegistryResult<SharedInstance> {
        definition
            .construct()
            .map_err(|source| RegistryError::Instantiation {
                qualified_name: definition.type_info().qualified_name.clone(),
                source,
            })
    }

    fn record(
        registry: &mut ComponentRegistry,
        warnings: &mut Vec<BuildWarning>,
        name: String,
        entry: RegistryEntry,
    ) {
        let kept = entry.descriptor().qualified_name.clone();
        if let Some(replaced) = registry.insert(name.clone(), entry) {
            let replaced = replaced.descriptor().qualified_name.clone();
            warn!("注册名称冲突: {}, {} 被 {} 覆盖", name, replaced, kept);
            warnings.push(BuildWarning::DuplicateComponentName {
                name,
                replaced,
                kept,
            });
        }
    }
}

#[async_trait]
impl RegistryBuilder for CatalogRegistryBuilder {
    async fn build(
        &self,
        candidates: &[String],
    ) -> RegistryResult<(ComponentRegistry, Vec<BuildWarning>)> {
        let mut registry = ComponentRegistry::new();
        let mut warnings = Vec::new();

        for qualified_name in candidates {
            let definition =
                self.catalog
                    .lookup(qualified_name)
                    .ok_or_else(|| RegistryError::TypeResolution {
                        qualified_name: qualified_name.clone(),
                    })?;

            match definition.kind() {
                ComponentKind::Handler { .. } => {
                    let name = definition.type_info().component_name();
                    let instance = Self::construct(&definition)?;
                    info!("注册处理器组件: {} -> {}", name, qualified_name);
                    let entry =
                        RegistryEntry::new(instance, definition.descriptor(), Arc::clone(&definition));
                    Self::record(&mut registry, &mut warnings, name, entry);
                }
                ComponentKind::Service { .. } => {
                    if let Some(declared) = definition.kind().declared_name() {
                        let instance = Self::construct(&definition)?;
                        let mut entry = RegistryEntry::new(
                            Arc::clone(&instance),
                            definition.descriptor(),
                            Arc::clone(&definition),
                        );
                        for capability in definition.capabilities() {
                            if let Some(view) = capability.expose(&instance) {
                                entry = entry.with_view(capability.qualified_name(), view);
                            }
                        }
                        info!("注册服务组件: {} -> {}", declared, qualified_name);
                        Self::record(&mut registry, &mut warnings, declared.to_string(), entry);
                    } else {
                        if definition.capabilities().is_empty() {
                            return Err(RegistryError::UnnamedService {
                                qualified_name: qualified_name.clone(),
                            });
                        }
                        // 同一实例按实现的每个能力各登记一次
                        let instance = Self::construct(&definition)?;
                        for capability in definition.capabilities() {
                            let mut entry = RegistryEntry::new(
                                Arc::clone(&instance),
                                definition.descriptor(),
                                Arc::clone(&definition),
                            );
                            if let Some(view) = capability.expose(&instance) {
                                entry = entry.with_view(capability.qualified_name(), view);
                            }
                            info!(
                                "按能力注册服务组件: {} -> {}",
                                capability.qualified_name(),
                                qualified_name
                            );
                            Self::record(
                                &mut registry,
                                &mut warnings,
                                capability.qualified_name().to_string(),
                                entry,
                            );
                        }
                    }
                }
                ComponentKind::Unmarked => {
                    debug!("忽略未标记类型: {}", qualified_name);
                }
            }
        }

        Ok((registry, warnings))
    }

    fn name(&self) -> &str {
        "CatalogRegistryBuilder"
    }
}
