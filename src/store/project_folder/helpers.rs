// SPDX-FileCopyrightText: 2026 Apinox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Project folder persistence helpers:
/// per-level reconcile (upsert + orphan prune), entity codecs, and directory
/// listing utilities.
impl ProjectFolder {
    fn save_interfaces(&self, interfaces: &[Interface]) -> Result<(), StoreError> {
        let interfaces_dir = self.root.join(INTERFACES_DIRNAME);
        fs::create_dir_all(&interfaces_dir).map_err(|source| StoreError::Io {
            path: interfaces_dir.clone(),
            source,
        })?;

        let segments = assign_segments(interfaces.iter().map(Interface::name), &[]);
        for (iface, segment) in interfaces.iter().zip(&segments) {
            let iface_dir = interfaces_dir.join(segment);
            self.write_json(
                &iface_dir.join(INTERFACE_META_FILENAME),
                &interface_to_json(iface),
            )?;
            self.save_operations(&iface_dir, iface.operations())?;
        }

        prune_orphan_dirs(&interfaces_dir, &segments.iter().cloned().collect())
    }

    fn save_operations(&self, iface_dir: &Path, operations: &[Operation]) -> Result<(), StoreError> {
        let segments = assign_segments(operations.iter().map(Operation::name), &[]);
        for (operation, segment) in operations.iter().zip(&segments) {
            let op_dir = iface_dir.join(segment);
            let meta = OperationMetaJson {
                name: operation.name().to_owned(),
                action: operation.action().map(ToOwned::to_owned),
            };
            self.write_json(&op_dir.join(OPERATION_META_FILENAME), &meta)?;
            self.save_requests(&op_dir, operation.requests())?;
        }

        prune_orphan_dirs(iface_dir, &segments.iter().cloned().collect())
    }

    fn save_requests(&self, op_dir: &Path, requests: &[Request]) -> Result<(), StoreError> {
        // The operation's own metadata document lives at `operation.json` in
        // the same directory; a request named "operation" must not claim it.
        let segments =
            assign_segments(requests.iter().map(Request::name), &[OPERATION_META_STEM]);
        for (request, segment) in requests.iter().zip(&segments) {
            write_atomic(
                &op_dir.join(format!("{segment}.xml")),
                request.body().as_bytes(),
                self.durability,
            )?;
            self.write_json(
                &op_dir.join(format!("{segment}.json")),
                &request_meta_to_json(request),
            )?;
        }

        prune_orphan_request_files(op_dir, &segments.iter().cloned().collect())
    }

    fn save_folders(&self, folders: &[Folder]) -> Result<(), StoreError> {
        let folders_dir = self.root.join(FOLDERS_DIRNAME);
        fs::create_dir_all(&folders_dir).map_err(|source| StoreError::Io {
            path: folders_dir.clone(),
            source,
        })?;

        // Folder order is significant and encoded in the filename prefix, so
        // the whole set is rewritten instead of upserted.
        clear_json_files(&folders_dir, None)?;

        let segments = assign_segments(folders.iter().map(Folder::name), &[]);
        for (index, (folder, segment)) in folders.iter().zip(&segments).enumerate() {
            let filename = format!("{}_{segment}.json", order_prefix(index));
            self.write_json(&folders_dir.join(filename), &folder_to_json(folder))?;
        }

        Ok(())
    }

    fn save_test_suites(&self, suites: &[TestSuite]) -> Result<(), StoreError> {
        let tests_dir = self.root.join(TESTS_DIRNAME);
        fs::create_dir_all(&tests_dir).map_err(|source| StoreError::Io {
            path: tests_dir.clone(),
            source,
        })?;

        let segments = assign_segments(suites.iter().map(TestSuite::name), &[]);
        for (suite, segment) in suites.iter().zip(&segments) {
            let suite_dir = tests_dir.join(segment);
            let meta = SuiteMetaJson {
                id: suite.id().to_string(),
                name: suite.name().to_owned(),
            };
            self.write_json(&suite_dir.join(SUITE_META_FILENAME), &meta)?;
            self.save_test_cases(&suite_dir, suite.test_cases())?;
        }

        prune_orphan_dirs(&tests_dir, &segments.iter().cloned().collect())
    }

    fn save_test_cases(&self, suite_dir: &Path, cases: &[TestCase]) -> Result<(), StoreError> {
        let segments = assign_segments(cases.iter().map(TestCase::name), &[]);
        for (case, segment) in cases.iter().zip(&segments) {
            let case_dir = suite_dir.join(segment);
            let meta = CaseMetaJson {
                id: case.id().to_string(),
                name: case.name().to_owned(),
            };
            self.write_json(&case_dir.join(CASE_META_FILENAME), &meta)?;
            self.save_test_steps(&case_dir, case.steps())?;
        }

        prune_orphan_dirs(suite_dir, &segments.iter().cloned().collect())
    }

    fn save_test_steps(&self, case_dir: &Path, steps: &[TestStep]) -> Result<(), StoreError> {
        // Reordering renames every step file, so delete-and-rewrite is both
        // cheaper and safer than a partial upsert here.
        clear_json_files(case_dir, Some(CASE_META_FILENAME))?;

        let segments = assign_segments(steps.iter().map(TestStep::name), &[]);
        for (index, (step, segment)) in steps.iter().zip(&segments).enumerate() {
            let filename = format!("{}_{segment}.json", order_prefix(index));
            self.write_json(&case_dir.join(filename), &step_to_json(step))?;
        }

        Ok(())
    }

    fn load_interfaces(&self, project: &mut Project) -> Result<(), StoreError> {
        let interfaces_dir = self.root.join(INTERFACES_DIRNAME);
        for (segment, iface_dir) in list_subdirs(&interfaces_dir)? {
            let meta = read_json_or_default::<InterfaceMetaJson>(
                &iface_dir.join(INTERFACE_META_FILENAME),
            );
            let mut iface = interface_from_json(meta, &segment);

            for (op_segment, op_dir) in list_subdirs(&iface_dir)? {
                let op_meta = read_json_or_default::<OperationMetaJson>(
                    &op_dir.join(OPERATION_META_FILENAME),
                );
                let mut operation = operation_from_json(op_meta, &op_segment);
                self.load_requests(&op_dir, &mut operation)?;
                iface.operations_mut().push(operation);
            }

            project.interfaces_mut().push(iface);
        }
        Ok(())
    }

    fn load_requests(&self, op_dir: &Path, operation: &mut Operation) -> Result<(), StoreError> {
        // Pair <base>.xml (body) with <base>.json (metadata); either half may
        // be missing and is synthesized.
        let mut by_base: BTreeMap<String, (Option<String>, Option<RequestJson>)> = BTreeMap::new();

        for (file_name, path) in list_files(op_dir)? {
            if file_name == OPERATION_META_FILENAME {
                continue;
            }
            let Some((base, ext)) = file_name.rsplit_once('.') else {
                continue;
            };
            match ext.to_ascii_lowercase().as_str() {
                "xml" => {
                    let body = fs::read_to_string(&path).map_err(|source| StoreError::Io {
                        path: path.clone(),
                        source,
                    })?;
                    by_base.entry(base.to_owned()).or_default().0 = Some(body);
                }
                "json" => {
                    by_base.entry(base.to_owned()).or_default().1 =
                        read_json_or_none::<RequestJson>(&path);
                }
                _ => {}
            }
        }

        for (base, (body, meta)) in by_base {
            operation
                .requests_mut()
                .push(request_from_json(meta.unwrap_or_default(), body, &base));
        }
        Ok(())
    }

    fn load_folders(&self, project: &mut Project) -> Result<(), StoreError> {
        let folders_dir = self.root.join(FOLDERS_DIRNAME);
        let mut entries = list_files(&folders_dir)?;
        sort_by_order_prefix(&mut entries);
        for (file_name, path) in entries {
            let Some(stem) = file_name.strip_suffix(".json") else {
                continue;
            };
            let Some(folder_json) = read_json_or_none::<FolderJson>(&path) else {
                continue;
            };
            project
                .folders_mut()
                .push(folder_from_json(folder_json, strip_order_prefix(stem)));
        }
        Ok(())
    }

    fn load_test_suites(&self, project: &mut Project) -> Result<(), StoreError> {
        let tests_dir = self.root.join(TESTS_DIRNAME);
        for (suite_segment, suite_dir) in list_subdirs(&tests_dir)? {
            let meta =
                read_json_or_default::<SuiteMetaJson>(&suite_dir.join(SUITE_META_FILENAME));
            let mut suite = suite_from_json(meta, &suite_segment);

            for (case_segment, case_dir) in list_subdirs(&suite_dir)? {
                let case_meta =
                    read_json_or_default::<CaseMetaJson>(&case_dir.join(CASE_META_FILENAME));
                let mut case = case_from_json(case_meta, &case_segment);

                let mut step_files = list_files(&case_dir)?;
                sort_by_order_prefix(&mut step_files);
                for (file_name, path) in step_files {
                    if file_name == CASE_META_FILENAME {
                        continue;
                    }
                    let Some(stem) = file_name.strip_suffix(".json") else {
                        continue;
                    };
                    let Some(step_json) = read_json_or_none::<StepJson>(&path) else {
                        continue;
                    };
                    case.steps_mut()
                        .push(step_from_json(step_json, strip_order_prefix(stem)));
                }

                suite.test_cases_mut().push(case);
            }

            project.test_suites_mut().push(suite);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProjectPropertiesJson {
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    format: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct InterfaceMetaJson {
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default, rename = "bindingName", skip_serializing_if = "Option::is_none")]
    binding_name: Option<String>,
    #[serde(default, rename = "soapVersion", skip_serializing_if = "Option::is_none")]
    protocol_version: Option<String>,
    #[serde(default, rename = "definition", skip_serializing_if = "Option::is_none")]
    definition_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct OperationMetaJson {
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    action: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RequestJson {
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    method: Option<String>,
    #[serde(default, rename = "contentType", skip_serializing_if = "Option::is_none")]
    content_type: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    assertions: Vec<AssertionJson>,
    /// Body text, present only when the request is embedded in another
    /// document (folder files, test steps); operation requests keep the body
    /// in a sibling `.xml` payload file instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AssertionJson {
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    configuration: AssertionConfigJson,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AssertionConfigJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, rename = "ignoreCase", skip_serializing_if = "Option::is_none")]
    ignore_case: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sla: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    xpath: Option<String>,
    #[serde(default, rename = "expectedContent", skip_serializing_if = "Option::is_none")]
    expected_content: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FolderJson {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    expanded: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    folders: Vec<FolderJson>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    requests: Vec<RequestJson>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SuiteMetaJson {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CaseMetaJson {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StepJson {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    config: StepConfigJson,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StepConfigJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request: Option<RequestJson>,
    #[serde(default, rename = "scriptName", skip_serializing_if = "Option::is_none")]
    script_name: Option<String>,
    #[serde(default, rename = "scriptContent", skip_serializing_if = "Option::is_none")]
    script_content: Option<String>,
    #[serde(default, rename = "delayMs", skip_serializing_if = "Option::is_none")]
    delay_ms: Option<u64>,
}

fn interface_to_json(iface: &Interface) -> InterfaceMetaJson {
    InterfaceMetaJson {
        name: iface.name().to_owned(),
        kind: Some(iface.kind().to_owned()),
        binding_name: iface.binding_name().map(ToOwned::to_owned),
        protocol_version: iface.protocol_version().map(ToOwned::to_owned),
        definition_source: iface.definition_source().map(ToOwned::to_owned),
        id: iface.id().map(ToOwned::to_owned),
    }
}

fn interface_from_json(meta: InterfaceMetaJson, segment: &str) -> Interface {
    let name = if meta.name.is_empty() {
        segment.to_owned()
    } else {
        meta.name
    };
    let mut iface = Interface::new(name, meta.kind.unwrap_or_else(|| "wsdl".to_owned()));
    iface.set_binding_name(meta.binding_name);
    iface.set_protocol_version(meta.protocol_version);
    iface.set_definition_source(meta.definition_source);
    iface.set_id(meta.id);
    iface
}

fn operation_from_json(meta: OperationMetaJson, segment: &str) -> Operation {
    let name = if meta.name.is_empty() {
        segment.to_owned()
    } else {
        meta.name
    };
    let mut operation = Operation::new(name);
    operation.set_action(meta.action);
    operation
}

fn request_meta_to_json(request: &Request) -> RequestJson {
    RequestJson {
        name: request.name().to_owned(),
        id: request.id().map(|id| id.to_string()),
        endpoint: request.endpoint().map(ToOwned::to_owned),
        method: request.method().map(ToOwned::to_owned),
        content_type: request.content_type().map(ToOwned::to_owned),
        headers: request.headers().clone(),
        assertions: request.assertions().iter().map(assertion_to_json).collect(),
        request: None,
    }
}

fn request_embedded_to_json(request: &Request) -> RequestJson {
    RequestJson {
        request: Some(request.body().to_owned()),
        ..request_meta_to_json(request)
    }
}

fn request_from_json(json: RequestJson, body: Option<String>, segment: &str) -> Request {
    let name = if json.name.is_empty() {
        segment.to_owned()
    } else {
        json.name
    };
    let body = body.or(json.request).unwrap_or_default();

    let mut request = Request::new(name, body);
    request.set_id(Some(
        json.id
            .and_then(|raw| RequestId::new(raw).ok())
            .unwrap_or_else(|| RequestId::synthesized("request", segment)),
    ));
    request.set_endpoint(json.endpoint);
    request.set_method(json.method);
    request.set_content_type(json.content_type);
    *request.headers_mut() = json.headers;
    *request.assertions_mut() = json.assertions.into_iter().map(assertion_from_json).collect();
    request
}

fn assertion_to_json(assertion: &Assertion) -> AssertionJson {
    AssertionJson {
        kind: assertion.kind.clone(),
        name: assertion.name.clone(),
        id: assertion.id.clone(),
        configuration: AssertionConfigJson {
            token: assertion.configuration.token.clone(),
            ignore_case: assertion.configuration.ignore_case,
            sla: assertion.configuration.sla.clone(),
            xpath: assertion.configuration.xpath.clone(),
            expected_content: assertion.configuration.expected_content.clone(),
        },
    }
}

fn assertion_from_json(json: AssertionJson) -> Assertion {
    Assertion {
        kind: json.kind,
        name: json.name,
        id: json.id,
        configuration: AssertionConfig {
            token: json.configuration.token,
            ignore_case: json.configuration.ignore_case,
            sla: json.configuration.sla,
            xpath: json.configuration.xpath,
            expected_content: json.configuration.expected_content,
        },
    }
}

fn folder_to_json(folder: &Folder) -> FolderJson {
    FolderJson {
        id: folder.id().to_string(),
        name: folder.name().to_owned(),
        expanded: folder.expanded(),
        folders: folder.folders().iter().map(folder_to_json).collect(),
        requests: folder.requests().iter().map(request_embedded_to_json).collect(),
    }
}

fn folder_from_json(json: FolderJson, segment: &str) -> Folder {
    let name = if json.name.is_empty() {
        segment.to_owned()
    } else {
        json.name
    };
    let id = FolderId::new(json.id)
        .unwrap_or_else(|_| FolderId::synthesized("folder", segment));

    let mut folder = Folder::new(id, name);
    folder.set_expanded(json.expanded);
    for (index, child) in json.folders.into_iter().enumerate() {
        let child_segment = format!("{segment}_{index}");
        folder.folders_mut().push(folder_from_json(child, &child_segment));
    }
    for request_json in json.requests {
        let request_segment = sanitize_name(&request_json.name);
        folder
            .requests_mut()
            .push(request_from_json(request_json, None, &request_segment));
    }
    folder
}

fn suite_from_json(meta: SuiteMetaJson, segment: &str) -> TestSuite {
    let name = if meta.name.is_empty() {
        segment.to_owned()
    } else {
        meta.name
    };
    let id = TestSuiteId::new(meta.id)
        .unwrap_or_else(|_| TestSuiteId::synthesized("suite", segment));
    TestSuite::new(id, name)
}

fn case_from_json(meta: CaseMetaJson, segment: &str) -> TestCase {
    let name = if meta.name.is_empty() {
        segment.to_owned()
    } else {
        meta.name
    };
    let id = TestCaseId::new(meta.id)
        .unwrap_or_else(|_| TestCaseId::synthesized("case", segment));
    TestCase::new(id, name)
}

fn step_to_json(step: &TestStep) -> StepJson {
    let config = match step.config() {
        StepConfig::Request { request } => StepConfigJson {
            request: Some(request_embedded_to_json(request)),
            ..StepConfigJson::default()
        },
        StepConfig::Script {
            script_name,
            source,
        } => StepConfigJson {
            script_name: script_name.clone(),
            script_content: Some(source.clone()),
            ..StepConfigJson::default()
        },
        StepConfig::Delay { millis } => StepConfigJson {
            delay_ms: Some(*millis),
            ..StepConfigJson::default()
        },
    };

    StepJson {
        id: step.id().to_string(),
        name: step.name().to_owned(),
        kind: step.config().kind().to_owned(),
        config,
    }
}

fn step_from_json(json: StepJson, segment: &str) -> TestStep {
    let name = if json.name.is_empty() {
        segment.to_owned()
    } else {
        json.name
    };
    let id = TestStepId::new(json.id)
        .unwrap_or_else(|_| TestStepId::synthesized("step", segment));

    let config = match json.kind.as_str() {
        "request" => {
            let request_json = json.config.request.unwrap_or_default();
            let request_segment = sanitize_name(&request_json.name);
            StepConfig::Request {
                request: request_from_json(request_json, None, &request_segment),
            }
        }
        "delay" => StepConfig::Delay {
            millis: json.config.delay_ms.unwrap_or(0),
        },
        // "script" and any unknown variant degrade to a script step so the
        // raw config text is not dropped on reload.
        _ => StepConfig::Script {
            script_name: json.config.script_name,
            source: json.config.script_content.unwrap_or_default(),
        },
    };

    TestStep::new(id, name, config)
}

/// Assigns filesystem segments for one container level. Sanitization is not
/// injective, so colliding siblings get a numeric suffix instead of silently
/// merging on disk. `reserved` holds stems the container already owns for its
/// own metadata documents; an entity landing on one gets suffixed the same
/// way a colliding sibling would.
fn assign_segments<'a>(
    names: impl Iterator<Item = &'a str>,
    reserved: &[&str],
) -> Vec<String> {
    let mut used = reserved
        .iter()
        .map(|stem| (*stem).to_owned())
        .collect::<BTreeSet<String>>();
    let mut out = Vec::new();
    for name in names {
        let base = sanitize_name(name);
        let mut candidate = base.clone();
        let mut counter = 2usize;
        while !used.insert(candidate.clone()) {
            candidate = format!("{base}_{counter}");
            counter += 1;
        }
        out.push(candidate);
    }
    out
}

/// Two digits minimum, wider when a set outgrows 99 entries. Loads order by
/// the parsed prefix value, so the mixed widths stay sorted correctly.
fn order_prefix(index: usize) -> String {
    format!("{:02}", index + 1)
}

/// Numeric value of a `NN_` order prefix, if the stem carries one.
fn order_index(stem: &str) -> Option<u64> {
    let (prefix, rest) = stem.split_once('_')?;
    if prefix.is_empty() || rest.is_empty() || !prefix.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    prefix.parse().ok()
}

/// Restores significant order for a prefixed file set. Sorting the raw names
/// would interleave `100_` before `10_`; sorting by prefix value does not.
/// Unprefixed stragglers keep their name order at the end.
fn sort_by_order_prefix(files: &mut [(String, PathBuf)]) {
    files.sort_by_key(|(name, _)| {
        let stem = name.strip_suffix(".json").unwrap_or(name);
        order_index(stem).unwrap_or(u64::MAX)
    });
}

fn strip_order_prefix(stem: &str) -> &str {
    if let Some((prefix, rest)) = stem.split_once('_') {
        if !prefix.is_empty() && !rest.is_empty() && prefix.chars().all(|ch| ch.is_ascii_digit()) {
            return rest;
        }
    }
    stem
}

/// Lists immediate subdirectories, sorted by name for deterministic loads.
/// A missing container directory is simply empty.
fn list_subdirs(dir: &Path) -> Result<Vec<(String, PathBuf)>, StoreError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(StoreError::Io {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut dirs = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            entry
                .file_name()
                .to_str()
                .map(|name| (name.to_owned(), entry.path()))
        })
        .collect::<Vec<_>>();
    dirs.sort();
    Ok(dirs)
}

/// Lists immediate files, sorted by name. A missing directory is empty.
fn list_files(dir: &Path) -> Result<Vec<(String, PathBuf)>, StoreError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(StoreError::Io {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut files = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| {
            entry
                .file_name()
                .to_str()
                .map(|name| (name.to_owned(), entry.path()))
        })
        .collect::<Vec<_>>();
    files.sort();
    Ok(files)
}

/// Orphan-pruning pass for one container level: any subdirectory whose
/// segment was not just upserted belongs to an entity that no longer exists
/// anywhere in the tree, so its whole subtree goes.
fn prune_orphan_dirs(dir: &Path, keep: &BTreeSet<String>) -> Result<(), StoreError> {
    for (segment, path) in list_subdirs(dir)? {
        if keep.contains(&segment) {
            continue;
        }
        log::debug!("pruning orphaned directory {path:?}");
        match fs::remove_dir_all(&path) {
            Ok(()) => {}
            Err(source) if source.kind() == io::ErrorKind::NotFound => {}
            Err(source) => return Err(StoreError::Io { path, source }),
        }
    }
    Ok(())
}

/// Removes request payload/metadata file pairs whose base name no longer
/// matches a current request (renamed or deleted requests).
fn prune_orphan_request_files(op_dir: &Path, keep: &BTreeSet<String>) -> Result<(), StoreError> {
    for (file_name, path) in list_files(op_dir)? {
        if file_name == OPERATION_META_FILENAME {
            continue;
        }
        let Some((base, ext)) = file_name.rsplit_once('.') else {
            continue;
        };
        if !matches!(ext.to_ascii_lowercase().as_str(), "xml" | "json") {
            continue;
        }
        if keep.contains(base) {
            continue;
        }
        log::debug!("pruning orphaned request file {path:?}");
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(source) if source.kind() == io::ErrorKind::NotFound => {}
            Err(source) => return Err(StoreError::Io { path, source }),
        }
    }
    Ok(())
}

/// Deletes every `.json` file in `dir` except `protect`, ahead of a
/// full-rewrite of an order-prefixed file set.
fn clear_json_files(dir: &Path, protect: Option<&str>) -> Result<(), StoreError> {
    for (file_name, path) in list_files(dir)? {
        if !file_name.ends_with(".json") {
            continue;
        }
        if protect.is_some_and(|keep| keep == file_name) {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(source) if source.kind() == io::ErrorKind::NotFound => {}
            Err(source) => return Err(StoreError::Io { path, source }),
        }
    }
    Ok(())
}

fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let contents = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Per-entity recoverable read: missing or unparsable metadata yields `None`
/// and a log record; the caller synthesizes defaults and the load continues.
fn read_json_or_none<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    match read_json_file(path) {
        Ok(value) => Some(value),
        Err(StoreError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => None,
        Err(err) => {
            log::warn!("ignoring unreadable metadata, synthesizing defaults: {err}");
            None
        }
    }
}

fn read_json_or_default<T: serde::de::DeserializeOwned + Default>(path: &Path) -> T {
    read_json_or_none(path).unwrap_or_default()
}
