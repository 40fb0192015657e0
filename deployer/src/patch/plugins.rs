use consensus_core::config::Params;
use consensus_core::tx::TransactionType;

use super::{apply_rules, PatchRule, Patched};
use crate::errors::DeployResult;

fn port_rule(env_key: &str, port: u16) -> DeployResult<PatchRule> {
    PatchRule::new(
        format!("port:{env_key}"),
        &format!(r"(port:\s*process\.env\.{env_key}\s*\|\|\s*)\d+"),
        format!("${{1}}{port}"),
    )
}

/// Ordered substitutions for `plugins.js`.
///
/// The final rule strips the fee detail block after `enabled: false` and so
/// must run after the `enabled` substitution.
pub fn plugin_rules(params: &Params) -> DeployResult<Vec<PatchRule>> {
    let fees = &params.dynamic_fees;
    let bindings = &params.bindings;
    // the detail block is gone once dynamic fees were switched off
    let detail_optional = !fees.enabled;

    let mut rules = vec![
        port_rule("CORE_P2P_PORT", bindings.p2p_port)?,
        port_rule("CORE_API_PORT", bindings.api_port)?,
        port_rule("CORE_WEBHOOKS_PORT", bindings.webhook_port)?,
        port_rule("CORE_EXCHANGE_JSON_RPC_PORT", bindings.json_rpc_port)?,
        PatchRule::new("dynamicFees.enabled", r"(dynamicFees:\s*\{\s*enabled:\s*)(?:true|false)", format!("${{1}}{}", fees.enabled))?,
        PatchRule::new("dynamicFees.minFeePool", r"(minFeePool:\s*)\d+", format!("${{1}}{}", fees.min_fee_pool))?
            .optional(detail_optional),
        PatchRule::new("dynamicFees.minFeeBroadcast", r"(minFeeBroadcast:\s*)\d+", format!("${{1}}{}", fees.min_fee_broadcast))?
            .optional(detail_optional),
    ];

    for tx_type in TransactionType::CORE.into_iter().chain(TransactionType::EXTENDED) {
        let key = tx_type.fee_key();
        rules.push(
            PatchRule::new(
                format!("dynamicFees.addonBytes.{key}"),
                &format!(r"(addonBytes:\s*\{{[^}}]*?\b{key}:\s*)\d+"),
                format!("${{1}}{}", fees.addon_bytes.get(tx_type)),
            )?
            .optional(detail_optional),
        );
    }

    rules.push(
        PatchRule::new(
            "dynamicFees.disabledBlock",
            r"(dynamicFees:\s*\{\s*enabled:\s*false,)\s*minFeePool:[^,]*,\s*minFeeBroadcast:[^,]*,\s*addonBytes:\s*\{[^}]*\},?",
            "${1}",
        )?
        .optional(true),
    );

    Ok(rules)
}

pub fn patch_plugins_text(text: &str, params: &Params) -> DeployResult<Patched> {
    Ok(apply_rules(text, &plugin_rules(params)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLUGINS: &str = r#"module.exports = {
    "@arkecosystem/core-p2p": {
        server: {
            port: process.env.CORE_P2P_PORT || 4002,
        },
    },
    "@arkecosystem/core-transaction-pool": {
        enabled: !process.env.CORE_TRANSACTION_POOL_DISABLED,
        dynamicFees: {
            enabled: true,
            minFeePool: 1000,
            minFeeBroadcast: 1000,
            addonBytes: {
                transfer: 100,
                secondSignature: 250,
                delegateRegistration: 400000,
                vote: 100,
                multiSignature: 500,
                ipfs: 250,
                multiPayment: 500,
                delegateResignation: 400000,
            },
        },
    },
    "@arkecosystem/core-api": {
        port: process.env.CORE_API_PORT || 4003,
    },
    "@arkecosystem/core-webhooks": {
        port: process.env.CORE_WEBHOOKS_PORT || 4004,
    },
    "@arkecosystem/core-exchange-json-rpc": {
        port: process.env.CORE_EXCHANGE_JSON_RPC_PORT || 8080,
    },
};
"#;

    #[test]
    fn test_ports_and_fees_are_substituted() {
        let mut params = Params::default();
        params.bindings.p2p_port = 5102;
        params.bindings.api_port = 5103;
        params.bindings.webhook_port = 5104;
        params.bindings.json_rpc_port = 9090;
        params.dynamic_fees.min_fee_pool = 7;
        params.dynamic_fees.addon_bytes.vote = 42;

        let patched = patch_plugins_text(PLUGINS, &params).unwrap();
        let text = &patched.text;
        assert!(text.contains("port: process.env.CORE_P2P_PORT || 5102,"));
        assert!(text.contains("port: process.env.CORE_API_PORT || 5103,"));
        assert!(text.contains("port: process.env.CORE_WEBHOOKS_PORT || 5104,"));
        assert!(text.contains("port: process.env.CORE_EXCHANGE_JSON_RPC_PORT || 9090,"));
        assert!(text.contains("minFeePool: 7,"));
        assert!(text.contains("minFeeBroadcast: 3000,"));
        assert!(text.contains("                vote: 42,"));
        assert!(text.contains("transfer: 100,"));
        assert_eq!(patched.missed, vec!["dynamicFees.disabledBlock".to_string()]);
        assert!(text.ends_with("};\n"));
    }

    #[test]
    fn test_disabled_dynamic_fees_drop_detail_block() {
        let mut params = Params::default();
        params.dynamic_fees.enabled = false;

        let patched = patch_plugins_text(PLUGINS, &params).unwrap();
        assert!(patched.text.contains("enabled: false,\n        },"));
        assert!(!patched.text.contains("minFeePool"));
        assert!(!patched.text.contains("addonBytes"));
        assert!(patched.text.contains("enabled: !process.env.CORE_TRANSACTION_POOL_DISABLED"));
    }

    #[test]
    fn test_reapplying_is_a_no_op() {
        for enabled in [true, false] {
            let mut params = Params::default();
            params.dynamic_fees.enabled = enabled;
            let once = patch_plugins_text(PLUGINS, &params).unwrap().text;
            let twice = patch_plugins_text(&once, &params).unwrap().text;
            assert_eq!(once, twice, "enabled = {enabled}");
        }
    }

    #[test]
    fn test_missing_plugin_sections_are_misses() {
        let patched = patch_plugins_text("module.exports = {};", &Params::default()).unwrap();
        assert_eq!(patched.text, "module.exports = {};");
        assert!(patched.missed.contains(&"port:CORE_P2P_PORT".to_string()));
    }
}
