//! Typed accessors for the unit configuration keys

use serde::Serialize;
use std::fmt;

use crate::error::Result;
use crate::issuer;
use crate::keys::{self, *};
use crate::store::ConfigStore;

/// Default `$batch` timeout (ms)
pub const DEFAULT_BATCH_TIMEOUT_MS: u64 = 270_000;
/// Default `$batch` sleep (ms)
pub const DEFAULT_BATCH_SLEEP_MS: u64 = 50;
/// Default `$batch` sleep interval (ms)
pub const DEFAULT_BATCH_SLEEP_INTERVAL_MS: u64 = 1_000;
/// Default maximum requests in one `$batch`
pub const DEFAULT_BATCH_BULK_REQUEST_MAX_SIZE: u32 = 1_000;

/// Secret configuration value, redacted in `Debug` and `Display`
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wrap a secret value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw secret
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the secret is empty (unset)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Per-layer property limits for user data schemas
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyLimits {
    /// Simple type properties allowed at each nesting layer
    pub simple: Vec<i32>,
    /// Complex type properties allowed at each nesting layer
    pub complex: Vec<i32>,
}

impl ConfigStore {
    // ------------------------------------------------------------------
    // Unit
    // ------------------------------------------------------------------

    /// Unit version
    pub fn core_version(&self) -> Option<String> {
        self.get(CORE_VERSION)
    }

    /// Thread pool size for cell I/O
    pub fn thread_pool_num_io_cell(&self) -> Result<i32> {
        self.get_int(THREAD_POOL_NUM_IO_CELL)
    }

    /// Thread pool size for box I/O
    pub fn thread_pool_num_io_box(&self) -> Result<i32> {
        self.get_int(THREAD_POOL_NUM_IO_BOX)
    }

    /// Thread pool size for miscellaneous work
    pub fn thread_pool_num_misc(&self) -> Result<i32> {
        self.get_int(THREAD_POOL_NUM_MISC)
    }

    /// Unit master token
    pub fn master_token(&self) -> Result<Secret> {
        self.get_required(MASTER_TOKEN).map(Secret::new)
    }

    /// Space separated unit user token issuers
    pub fn unit_user_issuers(&self) -> Option<String> {
        self.get(UNIT_USER_ISSUERS)
    }

    /// Whether `issuer` may issue unit user tokens
    ///
    /// Local-unit entries in the allow-list are resolved against
    /// `unit_base_url` first.
    pub fn check_unit_user_issuers(&self, issuer: &str, unit_base_url: &str) -> bool {
        let issuers = self.unit_user_issuers();
        self.membership_check(issuers.as_deref(), Some(issuer), unit_base_url)
    }

    /// Unit URL scheme
    pub fn unit_scheme(&self) -> Result<String> {
        self.get_required(UNIT_SCHEME)
    }

    /// Unit URL port; `None` when unset or not a port number
    pub fn unit_port(&self) -> Option<u16> {
        self.get(UNIT_PORT)
            .and_then(|port| port.trim().parse::<u16>().ok())
    }

    /// Unit URL path
    pub fn unit_path(&self) -> Option<String> {
        self.get(UNIT_PATH)
    }

    /// Plugin directory
    pub fn plugin_path(&self) -> Option<String> {
        self.get(PLUGIN_PATH)
    }

    /// Whether the unit is served over HTTPS
    pub fn is_https(&self) -> Result<bool> {
        Ok(self.unit_scheme()? == "https")
    }

    /// Unit base URL for `host`, always ending in `/`
    pub fn base_url(&self, host: &str) -> Result<String> {
        let snapshot = self.snapshot();
        let scheme = snapshot.require(UNIT_SCHEME)?;
        let path = snapshot
            .get(UNIT_PATH)
            .unwrap_or("")
            .trim_matches('/');
        let port = snapshot
            .get(UNIT_PORT)
            .and_then(|port| port.trim().parse::<u16>().ok());

        let mut url = format!("{}://{}", scheme, host);
        if let Some(port) = port {
            url.push_str(&format!(":{}", port));
        }
        url.push('/');
        if !path.is_empty() {
            url.push_str(path);
            url.push('/');
        }
        Ok(url)
    }

    /// Rewrite a local-unit URL against this unit's base URL for `host`
    pub fn resolve_local_unit(&self, host: &str, value: &str) -> Result<String> {
        Ok(issuer::resolve_local_unit(&self.base_url(host)?, value))
    }

    // ------------------------------------------------------------------
    // OData
    // ------------------------------------------------------------------

    /// Maximum requests in one `$batch` (default 1000)
    pub fn odata_batch_bulk_request_max_size(&self) -> Result<u32> {
        self.snapshot().parse_or(
            odata::BATCH_BULK_REQUEST_MAX_SIZE,
            DEFAULT_BATCH_BULK_REQUEST_MAX_SIZE,
            "unsigned integer",
        )
    }

    /// `$batch` timeout in ms (default 270000)
    pub fn odata_batch_timeout_ms(&self) -> Result<u64> {
        self.snapshot().parse_or(
            odata::BATCH_REQUEST_TIMEOUT_IN_MILLIS,
            DEFAULT_BATCH_TIMEOUT_MS,
            "milliseconds",
        )
    }

    /// `$batch` sleep in ms (default 50)
    pub fn odata_batch_sleep_ms(&self) -> Result<u64> {
        self.snapshot().parse_or(
            odata::BATCH_SLEEP_IN_MILLIS,
            DEFAULT_BATCH_SLEEP_MS,
            "milliseconds",
        )
    }

    /// `$batch` sleep interval in ms (default 1000)
    pub fn odata_batch_sleep_interval_ms(&self) -> Result<u64> {
        self.snapshot().parse_or(
            odata::BATCH_SLEEP_INTERVAL_IN_MILLIS,
            DEFAULT_BATCH_SLEEP_INTERVAL_MS,
            "milliseconds",
        )
    }

    /// Maximum N:N `$links`
    pub fn links_n_to_n_max_size(&self) -> Result<i32> {
        self.get_int(odata::NN_LINKS_MAX_NUM)
    }

    /// Maximum `$top` when `$expand` is present
    pub fn top_query_max_size_with_expand(&self) -> Result<i32> {
        self.get_int(odata::EXPAND_TOP_MAXNUM)
    }

    /// Maximum `$expand` fan-out for list queries
    pub fn max_expand_size_for_list(&self) -> Result<i32> {
        self.get_int(odata::EXPAND_LIST_MAXNUM)
    }

    /// Maximum `$expand` fan-out for single-entity queries
    pub fn max_expand_size_for_retrieve(&self) -> Result<i32> {
        self.get_int(odata::EXPAND_RETRIEVE_MAXNUM)
    }

    /// Maximum `$top`
    pub fn top_query_max_size(&self) -> Result<i32> {
        self.get_int(odata::TOP_MAX_NUM)
    }

    /// Maximum `$skip`
    pub fn skip_query_max_size(&self) -> Result<i32> {
        self.get_int(odata::SKIP_MAX_NUM)
    }

    /// Default page size
    pub fn top_query_default_size(&self) -> Result<i32> {
        self.get_int(odata::TOP_DEFAULT_NUM)
    }

    /// Maximum `$expand` properties for list queries
    pub fn expand_property_max_size_for_list(&self) -> Result<i32> {
        self.get_int(odata::EXPAND_PROPERTY_MAX_NUM_LIST)
    }

    /// Maximum `$expand` properties for single-entity queries
    pub fn expand_property_max_size_for_retrieve(&self) -> Result<i32> {
        self.get_int(odata::EXPAND_PROPERTY_MAX_NUM_RETRIEVE)
    }

    // ------------------------------------------------------------------
    // Account, Dav, Security
    // ------------------------------------------------------------------

    /// Update the last-authenticated timestamp on password login
    pub fn account_last_authenticated_enabled(&self) -> Result<bool> {
        self.get_bool(account::LAST_AUTHENTICATED_ENABLED)
    }

    /// Maximum children per collection
    pub fn max_child_resource_count(&self) -> Result<i32> {
        self.get_int(dav::COLLECTION_CHILDRESOURCE_MAX_NUM)
    }

    /// Maximum collection depth
    pub fn max_collection_depth(&self) -> Result<i32> {
        self.get_int(dav::COLLECTION_DEPTH_MAX_NUM)
    }

    /// Token encryption key
    pub fn token_secret_key(&self) -> Result<Secret> {
        self.get_required(security::TOKEN_SECRET_KEY).map(Secret::new)
    }

    /// Password hashing salt
    pub fn auth_password_salt(&self) -> Result<Secret> {
        self.get_required(security::AUTH_PASSWORD_SALT).map(Secret::new)
    }

    /// Encrypt DAV file contents
    pub fn dav_encrypt_enabled(&self) -> Result<bool> {
        self.get_bool(security::DAV_ENCRYPT_ENABLED)
    }

    // ------------------------------------------------------------------
    // Lock
    // ------------------------------------------------------------------

    /// Lock backend type
    pub fn lock_type(&self) -> Option<String> {
        self.get(lock::TYPE)
    }

    /// Account lock lifetime (seconds)
    pub fn account_lock_lifetime(&self) -> Option<String> {
        self.get(lock::ACCOUNTLOCK_LIFETIME)
    }

    /// Lock retry count
    pub fn lock_retry_times(&self) -> Option<String> {
        self.get(lock::RETRY_TIMES)
    }

    /// Lock retry interval
    pub fn lock_retry_interval(&self) -> Option<String> {
        self.get(lock::RETRY_INTERVAL)
    }

    /// Cell lock retry count
    pub fn cell_lock_retry_times(&self) -> Result<i32> {
        self.get_int(lock::CELL_RETRY_TIMES)
    }

    /// Cell lock retry interval
    pub fn cell_lock_retry_interval(&self) -> Result<i64> {
        self.get_long(lock::CELL_RETRY_INTERVAL)
    }

    /// Lock memcached host
    pub fn lock_memcached_host(&self) -> Option<String> {
        self.get(lock::MEMCACHED_HOST)
    }

    /// Lock memcached port
    pub fn lock_memcached_port(&self) -> Option<String> {
        self.get(lock::MEMCACHED_PORT)
    }

    /// Lock memcached operation timeout (ms)
    pub fn lock_memcached_op_timeout(&self) -> Result<i64> {
        self.get_long(lock::MEMCACHED_OPTIMEOUT)
    }

    // ------------------------------------------------------------------
    // Search, binary data, blobs, events
    // ------------------------------------------------------------------

    /// Search hosts
    pub fn es_hosts(&self) -> Option<String> {
        self.get(es::HOSTS)
    }

    /// Search cluster name
    pub fn es_cluster_name(&self) -> Option<String> {
        self.get(es::CLUSTERNAME)
    }

    /// Search index prefix
    pub fn es_unit_prefix(&self) -> Option<String> {
        self.get(es::UNIT_PREFIX)
    }

    /// Maximum search hits
    pub fn es_top_num(&self) -> Result<i32> {
        self.get_int(es::TOP_NUM)
    }

    /// Search retry count
    pub fn es_retry_times(&self) -> Option<String> {
        self.get(es::RETRY_TIMES)
    }

    /// Search retry interval
    pub fn es_retry_interval(&self) -> Option<String> {
        self.get(es::RETRY_INTERVAL)
    }

    /// Delete binary data physically
    pub fn physical_delete_mode(&self) -> Result<bool> {
        self.get_bool(binary_data::PHYSICAL_DELETE_MODE)
    }

    /// fsync binary data writes
    pub fn fsync_enabled(&self) -> Result<bool> {
        self.get_bool(binary_data::FSYNC_ENABLED)
    }

    /// Retry count for DAV file operations
    pub fn dav_file_operation_retry_count(&self) -> Result<i32> {
        self.get_int(binary_data::MAX_RETRY_COUNT)
    }

    /// Retry interval (ms) for DAV file operations
    pub fn dav_file_operation_retry_interval(&self) -> Result<i64> {
        self.get_long(binary_data::RETRY_INTERVAL)
    }

    /// Blob store root
    pub fn blob_store_root(&self) -> Option<String> {
        self.get(blob_store::ROOT)
    }

    /// Current event log directory
    pub fn event_log_current_dir(&self) -> Option<String> {
        self.get(event::LOG_CURRENT_DIR)
    }

    /// Maximum event hops
    pub fn max_event_hop(&self) -> Result<i32> {
        self.get_int(event::HOP_MAXNUM)
    }

    // ------------------------------------------------------------------
    // User data schema limits
    // ------------------------------------------------------------------

    /// Maximum entity types per box
    pub fn userdata_max_entity_count(&self) -> Result<i32> {
        self.get_int(user_data::MAX_ENTITY_TYPES)
    }

    /// Maximum properties per entity type
    pub fn max_property_count_in_entity_type(&self) -> Result<i32> {
        self.get_int(user_data::MAX_PROPERTY_COUNT_IN_ENTITY)
    }

    /// Simple type limits per nesting layer
    pub fn userdata_simple_type_property_limits(&self) -> Result<Vec<i32>> {
        self.layered_limits(user_data::SIMPLE_TYPE_PROPERTY_LIMITS, 0)
    }

    /// Complex type limits per nesting layer
    ///
    /// Always as long as the simple type list: complex types cannot nest
    /// deeper than simple types.
    pub fn userdata_complex_type_property_limits(&self) -> Result<Vec<i32>> {
        Ok(self.userdata_property_limits()?.complex)
    }

    /// Simple and complex type limits resolved from one snapshot
    pub fn userdata_property_limits(&self) -> Result<PropertyLimits> {
        let snapshot = self.snapshot();
        let simple = snapshot.layered_limits(user_data::SIMPLE_TYPE_PROPERTY_LIMITS, 0)?;
        let complex = if simple.is_empty() {
            Vec::new()
        } else {
            snapshot.layered_limits(user_data::COMPLEX_TYPE_PROPERTY_LIMITS, simple.len())?
        };
        Ok(PropertyLimits { simple, complex })
    }

    // ------------------------------------------------------------------
    // Cache
    // ------------------------------------------------------------------

    /// Cache backend type
    pub fn cache_type(&self) -> Option<String> {
        self.get(cache::TYPE)
    }

    /// Cache cells
    pub fn is_cell_cache_enabled(&self) -> Result<bool> {
        self.get_bool(cache::CELL_CACHE_ENABLED)
    }

    /// Cache boxes
    pub fn is_box_cache_enabled(&self) -> Result<bool> {
        self.get_bool(cache::BOX_CACHE_ENABLED)
    }

    /// Cache schemas
    pub fn is_schema_cache_enabled(&self) -> Result<bool> {
        self.get_bool(cache::SCHEMA_CACHE_ENABLED)
    }

    /// Cache memcached host
    pub fn cache_memcached_host(&self) -> Option<String> {
        self.get(cache::MEMCACHED_HOST)
    }

    /// Cache memcached port
    pub fn cache_memcached_port(&self) -> Option<String> {
        self.get(cache::MEMCACHED_PORT)
    }

    /// Cache memcached operation timeout (ms)
    pub fn cache_memcached_op_timeout(&self) -> Result<i64> {
        self.get_long(cache::MEMCACHED_OPTIMEOUT)
    }

    /// Cache entry expiry (seconds)
    pub fn cache_memcached_expires_in(&self) -> Result<i32> {
        self.get_int(cache::MEMCACHED_EXPIRES_IN)
    }

    // ------------------------------------------------------------------
    // Engine, X509
    // ------------------------------------------------------------------

    /// Script engine host
    pub fn engine_host(&self) -> Option<String> {
        self.get(keys::engine::HOST)
    }

    /// Script engine port
    pub fn engine_port(&self) -> Result<i32> {
        self.get_int(keys::engine::PORT)
    }

    /// Script engine path
    pub fn engine_path(&self) -> Option<String> {
        self.get(keys::engine::PATH)
    }

    /// Root certificate paths; `None` when the key is absent
    pub fn x509_root_certificates(&self) -> Option<Vec<String>> {
        self.get(x509::ROOT_CRT).map(|value| {
            value
                .split(' ')
                .filter(|entry| !entry.is_empty())
                .map(str::to_string)
                .collect()
        })
    }

    /// Certificate path
    pub fn x509_certificate(&self) -> Option<String> {
        self.get(x509::CRT)
    }

    /// Private key path
    pub fn x509_private_key(&self) -> Option<String> {
        self.get(x509::KEY)
    }

    // ------------------------------------------------------------------
    // BAR, snapshots
    // ------------------------------------------------------------------

    /// Maximum archive size (MB)
    pub fn bar_file_max_size(&self) -> Result<i64> {
        self.get_long(bar::FILE_MAX_SIZE)
    }

    /// Maximum archive entry size (MB)
    pub fn bar_entry_max_size(&self) -> Result<i64> {
        self.get_long(bar::ENTRY_MAX_SIZE)
    }

    /// Response chunk size while linking user data
    pub fn bar_userdata_links_output_stream_size(&self) -> Result<i64> {
        self.get_long(bar::USERDATA_LINKS_OUTPUT_STREAM_SIZE)
    }

    /// Bulk insert size for user data
    pub fn bar_userdata_bulk_size(&self) -> Result<i64> {
        self.get_long(bar::USERDATA_BULK_SIZE)
    }

    /// Scratch directory for archive installs
    pub fn bar_install_temp_dir(&self) -> Result<String> {
        Ok(format!("{}/install", self.get_required(bar::TMP_DIR)?))
    }

    /// Scratch directory for archive exports
    pub fn bar_export_temp_dir(&self) -> Result<String> {
        Ok(format!("{}/export", self.get_required(bar::TMP_DIR)?))
    }

    /// Install progress expiry (seconds)
    pub fn bar_install_progress_expire_in_sec(&self) -> Option<String> {
        self.get(bar::PROGRESS_EXPIRE_IN_SEC)
    }

    /// Cell snapshot export root
    pub fn cell_snapshot_root(&self) -> Option<String> {
        self.get(cell_snapshot::ROOT)
    }

    // ------------------------------------------------------------------
    // Event bus, rules
    // ------------------------------------------------------------------

    /// Message queue implementation
    pub fn event_bus_mq(&self) -> Option<String> {
        self.get(event_bus::MQ)
    }

    /// ActiveMQ broker URL
    pub fn event_bus_activemq_broker_url(&self) -> Option<String> {
        self.get(event_bus::ACTIVEMQ_BROKER_URL)
    }

    /// Kafka bootstrap servers
    pub fn event_bus_kafka_servers(&self) -> Option<String> {
        self.get(event_bus::KAFKA_SERVERS)
    }

    /// Event queue name
    pub fn event_bus_queue_name(&self) -> Option<String> {
        self.get(event_bus::QUEUE)
    }

    /// Topic for all events
    pub fn event_bus_topic_name(&self) -> Option<String> {
        self.get(event_bus::TOPIC_ALL)
    }

    /// Topic for rule events
    pub fn event_bus_rule_topic_name(&self) -> Option<String> {
        self.get(event_bus::TOPIC_RULE)
    }

    /// Event processing threads
    pub fn event_proc_thread_num(&self) -> Result<i32> {
        self.get_int(event_bus::EVENTPROC_THREAD_NUM)
    }

    /// Timer event threads
    pub fn timer_event_thread_num(&self) -> Result<i32> {
        self.get_int(rule::TIMEREVENT_THREAD_NUM)
    }
}
