//! Configuration key names
//!
//! All keys live under [`KEY_ROOT`]. The groups below are organizational only;
//! the store itself is a flat map.

/// Root namespace shared by every unit configuration key
pub const KEY_ROOT: &str = "cellguard.unit.";

/// Environment variable naming the override file
pub const CONFIG_FILE_ENV: &str = "CELLGUARD_CONFIG_FILE";

macro_rules! unit_key {
    ($suffix:literal) => {
        concat!("cellguard.unit.", $suffix)
    };
}

/// Unit version
pub const CORE_VERSION: &str = unit_key!("version");
/// Worker threads for cell I/O
pub const THREAD_POOL_NUM_IO_CELL: &str = unit_key!("thread.pool.num.io.cell");
/// Worker threads for box I/O
pub const THREAD_POOL_NUM_IO_BOX: &str = unit_key!("thread.pool.num.io.box");
/// Worker threads for everything else
pub const THREAD_POOL_NUM_MISC: &str = unit_key!("thread.pool.num.misc");
/// Unit master token
pub const MASTER_TOKEN: &str = unit_key!("masterToken");
/// Space separated issuers accepted for unit user tokens
pub const UNIT_USER_ISSUERS: &str = unit_key!("unitUser.issuers");
/// Scheme of the unit URL
pub const UNIT_SCHEME: &str = unit_key!("unitScheme");
/// Port of the unit URL
pub const UNIT_PORT: &str = unit_key!("unitPort");
/// Path of the unit URL
pub const UNIT_PATH: &str = unit_key!("unitPath");
/// Plugin directory
pub const PLUGIN_PATH: &str = unit_key!("plugin.path");

/// OData query and `$batch` limits
pub mod odata {
    /// Maximum requests in one `$batch`
    pub const BATCH_BULK_REQUEST_MAX_SIZE: &str = unit_key!("odata.batch.bulkRequestMaxSize");
    /// `$batch` timeout
    pub const BATCH_REQUEST_TIMEOUT_IN_MILLIS: &str = unit_key!("odata.batch.timeoutInMillis");
    /// `$batch` sleep
    pub const BATCH_SLEEP_IN_MILLIS: &str = unit_key!("odata.batch.sleepInMillis");
    /// `$batch` sleep interval
    pub const BATCH_SLEEP_INTERVAL_IN_MILLIS: &str =
        unit_key!("odata.batch.sleepIntervalInMillis");
    /// Maximum N:N `$links`
    pub const NN_LINKS_MAX_NUM: &str = unit_key!("odata.links.NtoN.maxnum");
    /// Maximum `$top` together with `$expand`
    pub const EXPAND_TOP_MAXNUM: &str = unit_key!("odata.query.expand.top.maxnum");
    /// Maximum `$expand` fan-out when listing
    pub const EXPAND_LIST_MAXNUM: &str = unit_key!("odata.expand.list.maxnum");
    /// Maximum `$expand` fan-out when retrieving one entity
    pub const EXPAND_RETRIEVE_MAXNUM: &str = unit_key!("odata.expand.retrieve.maxnum");
    /// Maximum `$top`
    pub const TOP_MAX_NUM: &str = unit_key!("odata.query.top.maxnum");
    /// Maximum `$skip`
    pub const SKIP_MAX_NUM: &str = unit_key!("odata.query.skip.maxnum");
    /// Default page size
    pub const TOP_DEFAULT_NUM: &str = unit_key!("odata.query.top.defaultnum");
    /// Maximum `$expand` properties when listing
    pub const EXPAND_PROPERTY_MAX_NUM_LIST: &str =
        unit_key!("odata.query.expand.property.maxnum.list");
    /// Maximum `$expand` properties when retrieving one entity
    pub const EXPAND_PROPERTY_MAX_NUM_RETRIEVE: &str =
        unit_key!("odata.query.expand.property.maxnum.retrieve");
}

/// Account settings
pub mod account {
    /// Update the last-authenticated timestamp on password login
    pub const LAST_AUTHENTICATED_ENABLED: &str = unit_key!("account.lastauthenticated.enabled");
}

/// WebDAV collection limits
pub mod dav {
    /// Maximum children per collection
    pub const COLLECTION_CHILDRESOURCE_MAX_NUM: &str = unit_key!("dav.childresource.maxnum");
    /// Maximum collection depth
    pub const COLLECTION_DEPTH_MAX_NUM: &str = unit_key!("dav.depth.maxnum");
}

/// Secrets and encryption
pub mod security {
    /// Token encryption key
    pub const TOKEN_SECRET_KEY: &str = unit_key!("security.secret16");
    /// Password hashing salt
    pub const AUTH_PASSWORD_SALT: &str = unit_key!("security.auth.password.salt");
    /// Encrypt DAV file contents
    pub const DAV_ENCRYPT_ENABLED: &str = unit_key!("security.dav.encrypt.enabled");
}

/// Lock backend
pub mod lock {
    /// Backend type
    pub const TYPE: &str = unit_key!("lock.type");
    /// Account lock lifetime (seconds)
    pub const ACCOUNTLOCK_LIFETIME: &str = unit_key!("lock.accountlock.time");
    /// Retry count when acquiring a lock
    pub const RETRY_TIMES: &str = unit_key!("lock.retry.times");
    /// Retry interval when acquiring a lock
    pub const RETRY_INTERVAL: &str = unit_key!("lock.retry.interval");
    /// Retry count when acquiring a cell lock
    pub const CELL_RETRY_TIMES: &str = unit_key!("lock.cell.retry.times");
    /// Retry interval when acquiring a cell lock
    pub const CELL_RETRY_INTERVAL: &str = unit_key!("lock.cell.retry.interval");
    /// memcached host
    pub const MEMCACHED_HOST: &str = unit_key!("lock.memcached.host");
    /// memcached port
    pub const MEMCACHED_PORT: &str = unit_key!("lock.memcached.port");
    /// memcached operation timeout (ms)
    pub const MEMCACHED_OPTIMEOUT: &str = unit_key!("lock.memcached.opTimeout");
}

/// Search backend
pub mod es {
    /// Host list
    pub const HOSTS: &str = unit_key!("es.hosts");
    /// Cluster name
    pub const CLUSTERNAME: &str = unit_key!("es.cluster.name");
    /// Index prefix for this unit
    pub const UNIT_PREFIX: &str = unit_key!("es.unitPrefix");
    /// Maximum hits per search
    pub const TOP_NUM: &str = unit_key!("es.topnum");
    /// Retry count
    pub const RETRY_TIMES: &str = unit_key!("es.retryTimes");
    /// Retry interval
    pub const RETRY_INTERVAL: &str = unit_key!("es.retryInterval");
}

/// Binary file storage
pub mod binary_data {
    /// Delete files physically instead of logically
    pub const PHYSICAL_DELETE_MODE: &str = unit_key!("binaryData.physical.delete.mode");
    /// fsync on write
    pub const FSYNC_ENABLED: &str = unit_key!("binaryData.fsync.enabled");
    /// Retry count for hard link and rename operations
    pub const MAX_RETRY_COUNT: &str = unit_key!("binaryData.dav.retry.count");
    /// Retry interval (ms) for hard link and rename operations
    pub const RETRY_INTERVAL: &str = unit_key!("binaryData.dav.retry.interval");
}

/// Blob storage
pub mod blob_store {
    /// Blob root
    pub const ROOT: &str = unit_key!("blobStore.root");
}

/// User data schema limits
pub mod user_data {
    /// Maximum entity types per box
    pub const MAX_ENTITY_TYPES: &str = unit_key!("box.odata.schema.MaxEntityTypes");
    /// Maximum properties per entity type
    pub const MAX_PROPERTY_COUNT_IN_ENTITY: &str = unit_key!("box.odata.schema.MaxProperties");
    /// Simple type properties allowed per nesting layer (e.g. `400,100,20,0`)
    pub const SIMPLE_TYPE_PROPERTY_LIMITS: &str =
        unit_key!("box.odata.schema.property.LayerLimits.SimpleType");
    /// Complex type properties allowed per nesting layer (e.g. `20,20,50,0`)
    pub const COMPLEX_TYPE_PROPERTY_LIMITS: &str =
        unit_key!("box.odata.schema.property.LayerLimits.ComplexType");
}

/// Event logging
pub mod event {
    /// Directory of the current event log
    pub const LOG_CURRENT_DIR: &str = unit_key!("event.log.current.dir");
    /// Maximum event hop count
    pub const HOP_MAXNUM: &str = unit_key!("event.hop.maxnum");
}

/// Cache backend
pub mod cache {
    /// Backend type
    pub const TYPE: &str = unit_key!("cache.type");
    /// Cache cells
    pub const CELL_CACHE_ENABLED: &str = unit_key!("cache.cell.enabled");
    /// Cache boxes
    pub const BOX_CACHE_ENABLED: &str = unit_key!("cache.box.enabled");
    /// Cache schemas
    pub const SCHEMA_CACHE_ENABLED: &str = unit_key!("cache.schema.enabled");
    /// memcached host
    pub const MEMCACHED_HOST: &str = unit_key!("cache.memcached.host");
    /// memcached port
    pub const MEMCACHED_PORT: &str = unit_key!("cache.memcached.port");
    /// memcached operation timeout (ms)
    pub const MEMCACHED_OPTIMEOUT: &str = unit_key!("cache.memcached.opTimeout");
    /// Entry expiry (seconds)
    pub const MEMCACHED_EXPIRES_IN: &str = unit_key!("cache.memcached.expiresin");
}

/// Script engine endpoint
pub mod engine {
    /// Host
    pub const HOST: &str = unit_key!("engine.host");
    /// Port
    pub const PORT: &str = unit_key!("engine.port");
    /// Path
    pub const PATH: &str = unit_key!("engine.path");
}

/// X.509 material
pub mod x509 {
    /// Space separated root certificate paths
    pub const ROOT_CRT: &str = unit_key!("x509.root");
    /// Certificate path
    pub const CRT: &str = unit_key!("x509.crt");
    /// Private key path
    pub const KEY: &str = unit_key!("x509.key");
}

/// Box archive import/export
pub mod bar {
    /// Maximum archive size (MB)
    pub const FILE_MAX_SIZE: &str = unit_key!("bar.file.maxSize");
    /// Maximum archive entry size (MB)
    pub const ENTRY_MAX_SIZE: &str = unit_key!("bar.entry.maxSize");
    /// Response chunk size while linking user data
    pub const USERDATA_LINKS_OUTPUT_STREAM_SIZE: &str =
        unit_key!("bar.userdata.linksOutputStreamSize");
    /// Bulk insert size for user data
    pub const USERDATA_BULK_SIZE: &str = unit_key!("bar.userdata.bulkSize");
    /// Scratch directory
    pub const TMP_DIR: &str = unit_key!("bar.tmp.dir");
    /// Install progress expiry (seconds)
    pub const PROGRESS_EXPIRE_IN_SEC: &str = unit_key!("bar.progress.expireInSec");
}

/// Cell snapshots
pub mod cell_snapshot {
    /// Export root
    pub const ROOT: &str = unit_key!("cellSnapshot.root");
}

/// Event bus
pub mod event_bus {
    /// Message queue implementation
    pub const MQ: &str = unit_key!("eventbus.mq");
    /// ActiveMQ broker URL
    pub const ACTIVEMQ_BROKER_URL: &str = unit_key!("eventbus.activemq.brokerUrl");
    /// Kafka bootstrap servers
    pub const KAFKA_SERVERS: &str = unit_key!("eventbus.kafka.bootstrap.servers");
    /// Queue name
    pub const QUEUE: &str = unit_key!("eventbus.queue");
    /// Topic for all events
    pub const TOPIC_ALL: &str = unit_key!("eventbus.topic.all");
    /// Topic for rule events
    pub const TOPIC_RULE: &str = unit_key!("eventbus.topic.rule");
    /// Event processing threads
    pub const EVENTPROC_THREAD_NUM: &str = unit_key!("eventbus.eventProcessing.thread.num");
}

/// Rule engine
pub mod rule {
    /// Timer event threads
    pub const TIMEREVENT_THREAD_NUM: &str = unit_key!("rule.timerEvent.thread.num");
}

/// Whether values stored under `key` must not appear in logs
pub fn is_sensitive(key: &str) -> bool {
    let Some(suffix) = key.strip_prefix(KEY_ROOT) else {
        return false;
    };
    suffix.starts_with("security.") || suffix == "masterToken"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_share_root() {
        for key in [
            CORE_VERSION,
            UNIT_USER_ISSUERS,
            odata::BATCH_REQUEST_TIMEOUT_IN_MILLIS,
            user_data::COMPLEX_TYPE_PROPERTY_LIMITS,
            rule::TIMEREVENT_THREAD_NUM,
        ] {
            assert!(key.starts_with(KEY_ROOT), "{} should be rooted", key);
        }
    }

    #[test]
    fn test_sensitive_keys() {
        assert!(is_sensitive(security::TOKEN_SECRET_KEY));
        assert!(is_sensitive(security::AUTH_PASSWORD_SALT));
        assert!(is_sensitive(MASTER_TOKEN));
        assert!(!is_sensitive(UNIT_USER_ISSUERS));
        assert!(!is_sensitive("security.secret16"));
    }
}
