//! Assembly of the product → subproduct → subject → intent tree.
//!
//! The catalog is flat (one row per product/subproduct pair) and the
//! taxonomy entities reference it loosely: subjects point at catalog rows,
//! intents at subjects, articles at intents, subjects, or nothing but a
//! legacy free-text product label. `build` folds all of that into one
//! consistent tree, degrading to best-effort placement on dangling
//! references because the tree must always render for operators.
//!
//! Nothing is dropped: entities whose parents cannot be resolved surface in
//! the [`Hierarchy`] unplaced/unclassified sets.

use std::collections::HashMap;

use tracing::{debug, warn};
use uuid::Uuid;

use farol_core::{
    Article, CatalogProduct, Hierarchy, HierarchyNode, Intent, NodeLevel, Subject,
};

/// Separator used to join breadcrumb segments into `full_path`.
const PATH_SEPARATOR: &str = " > ";

// Assembly slots. The tree is built in flat vectors with index maps so
// subject/intent/article placement is O(1) per entity; nesting happens once
// at materialization.

#[derive(Debug)]
struct ProductSlot {
    name: String,
    /// Id of the generic (no-subproduct) catalog row, when one exists.
    product_id: Option<Uuid>,
    subproducts: Vec<SubproductSlot>,
    subjects: Vec<SubjectSlot>,
    articles: Vec<Article>,
}

#[derive(Debug)]
struct SubproductSlot {
    name: String,
    /// Id of the specific catalog row for this product/subproduct pair.
    product_id: Option<Uuid>,
    subjects: Vec<SubjectSlot>,
    articles: Vec<Article>,
}

#[derive(Debug)]
struct SubjectSlot {
    name: String,
    subject_id: Uuid,
    intents: Vec<IntentSlot>,
    articles: Vec<Article>,
}

#[derive(Debug)]
struct IntentSlot {
    name: String,
    intent_id: Uuid,
    articles: Vec<Article>,
}

/// Where a subject lives: product index, optional subproduct index, subject
/// index within that parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SubjectLoc {
    product: usize,
    subproduct: Option<usize>,
    subject: usize,
}

#[derive(Debug, Clone, Copy)]
struct IntentLoc {
    subject: SubjectLoc,
    intent: usize,
}

#[derive(Default)]
struct TreeBuilder {
    products: Vec<ProductSlot>,
    /// Lowercased product name → index into `products`.
    product_index: HashMap<String, usize>,
    /// Catalog row id → (product index, subproduct index).
    catalog_index: HashMap<Uuid, (usize, Option<usize>)>,
    subject_index: HashMap<Uuid, SubjectLoc>,
    intent_index: HashMap<Uuid, IntentLoc>,
}

impl TreeBuilder {
    fn product_slot(&mut self, name: &str) -> usize {
        let key = name.to_lowercase();
        if let Some(&idx) = self.product_index.get(&key) {
            return idx;
        }
        let idx = self.products.len();
        self.products.push(ProductSlot {
            name: name.to_string(),
            product_id: None,
            subproducts: Vec::new(),
            subjects: Vec::new(),
            articles: Vec::new(),
        });
        self.product_index.insert(key, idx);
        idx
    }

    fn subproduct_slot(&mut self, product: usize, name: &str) -> usize {
        let slot = &mut self.products[product];
        if let Some(idx) = slot
            .subproducts
            .iter()
            .position(|s| s.name.eq_ignore_ascii_case(name))
        {
            return idx;
        }
        slot.subproducts.push(SubproductSlot {
            name: name.to_string(),
            product_id: None,
            subjects: Vec::new(),
            articles: Vec::new(),
        });
        slot.subproducts.len() - 1
    }

    /// Step 1–2: seed product and subproduct slots from the catalog.
    ///
    /// The generic row's id lands at the product level, each specific row's
    /// id at its subproduct level. Sibling rows sharing a product name all
    /// fold into one product slot.
    fn seed_catalog(&mut self, products: &[CatalogProduct]) {
        for row in products {
            let p_idx = self.product_slot(&row.product_name);
            match &row.subproduct_name {
                None => {
                    if self.products[p_idx].product_id.is_none() {
                        self.products[p_idx].product_id = Some(row.id);
                    }
                    self.catalog_index.insert(row.id, (p_idx, None));
                }
                Some(sub_name) => {
                    let s_idx = self.subproduct_slot(p_idx, sub_name);
                    let sub = &mut self.products[p_idx].subproducts[s_idx];
                    if sub.product_id.is_none() {
                        sub.product_id = Some(row.id);
                    }
                    self.catalog_index.insert(row.id, (p_idx, Some(s_idx)));
                }
            }
        }
    }

    /// Step 3: attach subjects under their owning catalog row.
    fn place_subjects(&mut self, subjects: &[Subject]) -> Vec<Subject> {
        let mut unplaced = Vec::new();
        for subject in subjects {
            if self.subject_index.contains_key(&subject.id) {
                continue;
            }
            let Some(&(p_idx, sub_idx)) = self.catalog_index.get(&subject.product_catalog_id)
            else {
                warn!(
                    subject_id = %subject.id,
                    catalog_id = %subject.product_catalog_id,
                    "subject references missing catalog row"
                );
                unplaced.push(subject.clone());
                continue;
            };
            let list = match sub_idx {
                None => &mut self.products[p_idx].subjects,
                Some(s) => &mut self.products[p_idx].subproducts[s].subjects,
            };
            list.push(SubjectSlot {
                name: subject.name.clone(),
                subject_id: subject.id,
                intents: Vec::new(),
                articles: Vec::new(),
            });
            self.subject_index.insert(
                subject.id,
                SubjectLoc {
                    product: p_idx,
                    subproduct: sub_idx,
                    subject: list.len() - 1,
                },
            );
        }
        unplaced
    }

    fn subject_slot_mut(&mut self, loc: SubjectLoc) -> &mut SubjectSlot {
        match loc.subproduct {
            None => &mut self.products[loc.product].subjects[loc.subject],
            Some(s) => &mut self.products[loc.product].subproducts[s].subjects[loc.subject],
        }
    }

    /// Step 4: attach intents under their subjects.
    fn place_intents(&mut self, intents: &[Intent]) -> Vec<Intent> {
        let mut unplaced = Vec::new();
        for intent in intents {
            if self.intent_index.contains_key(&intent.id) {
                continue;
            }
            let Some(&loc) = self.subject_index.get(&intent.subject_id) else {
                warn!(
                    intent_id = %intent.id,
                    subject_id = %intent.subject_id,
                    "intent references missing subject"
                );
                unplaced.push(intent.clone());
                continue;
            };
            let slot = self.subject_slot_mut(loc);
            slot.intents.push(IntentSlot {
                name: intent.name.clone(),
                intent_id: intent.id,
                articles: Vec::new(),
            });
            let intent_idx = slot.intents.len() - 1;
            self.intent_index.insert(
                intent.id,
                IntentLoc {
                    subject: loc,
                    intent: intent_idx,
                },
            );
        }
        unplaced
    }

    /// Step 5: place each article at the finest resolvable granularity.
    ///
    /// Precedence: intent → subject → free-text product/subproduct →
    /// unclassified. A set-but-dangling id falls through to the next level
    /// rather than sinking the article.
    fn place_articles(&mut self, articles: &[Article]) -> Vec<Article> {
        let mut unclassified = Vec::new();
        for article in articles {
            if let Some(intent_id) = article.intent_id {
                let loc = self.intent_index.get(&intent_id).copied();
                if let Some(loc) = loc {
                    self.subject_slot_mut(loc.subject).intents[loc.intent]
                        .articles
                        .push(article.clone());
                    continue;
                }
                warn!(article_id = %article.id, intent_id = %intent_id,
                    "article references missing intent");
            }
            if let Some(subject_id) = article.subject_id {
                let loc = self.subject_index.get(&subject_id).copied();
                if let Some(loc) = loc {
                    self.subject_slot_mut(loc).articles.push(article.clone());
                    continue;
                }
                warn!(article_id = %article.id, subject_id = %subject_id,
                    "article references missing subject");
            }
            match article.product_standard.as_deref().map(str::trim) {
                Some(product_name) if !product_name.is_empty() => {
                    let p_idx = self.product_slot(product_name);
                    match article.subproduct_standard.as_deref().map(str::trim) {
                        Some(sub_name) if !sub_name.is_empty() => {
                            let s_idx = self.subproduct_slot(p_idx, sub_name);
                            self.products[p_idx].subproducts[s_idx]
                                .articles
                                .push(article.clone());
                        }
                        _ => self.products[p_idx].articles.push(article.clone()),
                    }
                }
                _ => unclassified.push(article.clone()),
            }
        }
        unclassified
    }

    /// Step 6: materialize slots into sorted `HierarchyNode`s with
    /// breadcrumb paths.
    fn materialize(self) -> Vec<HierarchyNode> {
        let mut roots: Vec<HierarchyNode> = self
            .products
            .into_iter()
            .map(|product| {
                let full_path = product.name.clone();
                let mut children: Vec<HierarchyNode> = product
                    .subproducts
                    .into_iter()
                    .map(|sub| {
                        let sub_path = join_path(&full_path, &sub.name);
                        let mut sub_children: Vec<HierarchyNode> = sub
                            .subjects
                            .into_iter()
                            .map(|s| materialize_subject(s, &sub_path))
                            .collect();
                        sort_nodes(&mut sub_children);
                        let mut articles = sub.articles;
                        sort_articles(&mut articles);
                        HierarchyNode {
                            name: sub.name,
                            level: NodeLevel::Subproduct,
                            full_path: sub_path,
                            children: sub_children,
                            articles,
                            product_id: sub.product_id,
                            subject_id: None,
                            intent_id: None,
                        }
                    })
                    .collect();
                children.extend(
                    product
                        .subjects
                        .into_iter()
                        .map(|s| materialize_subject(s, &full_path)),
                );
                sort_nodes(&mut children);
                let mut articles = product.articles;
                sort_articles(&mut articles);
                HierarchyNode {
                    name: product.name,
                    level: NodeLevel::Product,
                    full_path,
                    children,
                    articles,
                    product_id: product.product_id,
                    subject_id: None,
                    intent_id: None,
                }
            })
            .collect();
        sort_nodes(&mut roots);
        roots
    }
}

fn materialize_subject(slot: SubjectSlot, parent_path: &str) -> HierarchyNode {
    let full_path = join_path(parent_path, &slot.name);
    let mut children: Vec<HierarchyNode> = slot
        .intents
        .into_iter()
        .map(|intent| {
            let mut articles = intent.articles;
            sort_articles(&mut articles);
            HierarchyNode {
                full_path: join_path(&full_path, &intent.name),
                name: intent.name,
                level: NodeLevel::Intent,
                children: Vec::new(),
                articles,
                product_id: None,
                subject_id: None,
                intent_id: Some(intent.intent_id),
            }
        })
        .collect();
    sort_nodes(&mut children);
    let mut articles = slot.articles;
    sort_articles(&mut articles);
    HierarchyNode {
        name: slot.name,
        level: NodeLevel::Subject,
        full_path,
        children,
        articles,
        product_id: None,
        subject_id: Some(slot.subject_id),
        intent_id: None,
    }
}

fn join_path(parent: &str, name: &str) -> String {
    format!("{}{}{}", parent, PATH_SEPARATOR, name)
}

fn sort_nodes(nodes: &mut [HierarchyNode]) {
    nodes.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
}

fn sort_articles(articles: &mut [Article]) {
    articles.sort_by(|a, b| {
        a.description
            .to_lowercase()
            .cmp(&b.description.to_lowercase())
    });
}

/// Assemble the catalog and taxonomy snapshot into a navigable tree.
///
/// Deterministic and pure: same inputs, same tree. There is no error path;
/// dangling references degrade to the unplaced/unclassified sets and the
/// rest of the tree still renders.
pub fn build(
    products: &[CatalogProduct],
    subjects: &[Subject],
    intents: &[Intent],
    articles: &[Article],
) -> Hierarchy {
    let mut builder = TreeBuilder::default();
    builder.seed_catalog(products);
    let unplaced_subjects = builder.place_subjects(subjects);
    let unplaced_intents = builder.place_intents(intents);
    let unclassified = builder.place_articles(articles);
    let roots = builder.materialize();

    debug!(
        node_count = roots.iter().map(count_nodes).sum::<usize>(),
        unclassified_count = unclassified.len(),
        "hierarchy build complete"
    );

    Hierarchy {
        roots,
        unclassified,
        unplaced_subjects,
        unplaced_intents,
    }
}

fn count_nodes(node: &HierarchyNode) -> usize {
    1 + node.children.iter().map(count_nodes).sum::<usize>()
}
