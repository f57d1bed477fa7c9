//! Property tests for configuration resolution
//!
//! Determinism, override reflection, and no-panic robustness over the whole
//! parameter space.

#[cfg(test)]
mod tests {
    use crate::probe::FixedProbe;
    use crate::resolve::resolve;
    use crate::schema::{DevicePreference, PartialRunConfig};
    use crate::ComputeDevice;
    use proptest::prelude::*;

    // ============================================================
    // Arbitrary Generators
    // ============================================================

    fn arb_identifier() -> impl Strategy<Value = String> {
        prop::string::string_regex("[a-z][a-z0-9_-]{0,15}").unwrap()
    }

    /// Coupled head count and embedding width that satisfy divisibility
    fn arb_heads_and_width() -> impl Strategy<Value = (usize, usize)> {
        (
            prop::sample::select(vec![1usize, 2, 4, 8, 16]),
            1usize..=96,
        )
            .prop_map(|(heads, mult)| (heads, heads * mult))
    }

    /// Learning rate with a floor strictly below it
    fn arb_lr_pair() -> impl Strategy<Value = (f32, f32)> {
        (1e-5f32..1.0, 1e-3f32..0.9).prop_map(|(lr, frac)| (lr, lr * frac))
    }

    /// Decay horizon with a warmup that fits inside it
    fn arb_schedule() -> impl Strategy<Value = (usize, usize)> {
        (1usize..20_000).prop_flat_map(|decay| (Just(decay), 0..=decay))
    }

    fn arb_valid_partial() -> impl Strategy<Value = PartialRunConfig> {
        (
            (
                proptest::option::of(arb_identifier()),
                proptest::option::of(1usize..1000),
                proptest::option::of(1usize..1000),
                proptest::option::of(1usize..1000),
                proptest::option::of(1usize..32),
                proptest::option::of(1usize..512),
                proptest::option::of(1usize..4096),
                proptest::option::of(1usize..48),
            ),
            arb_heads_and_width(),
            proptest::option::of(0.0f32..0.99),
            arb_lr_pair(),
            proptest::option::of(1usize..50_000),
            arb_schedule(),
            proptest::option::of(0.5f32..0.9999),
            proptest::option::of(prop::sample::select(vec![
                DevicePreference::Auto,
                DevicePreference::Accelerator,
                DevicePreference::Cpu,
            ])),
            any::<bool>(),
        )
            .prop_map(
                |(
                    (out_dir, eval_interval, eval_iters, log_interval, accum, batch, context, layers),
                    (heads, width),
                    dropout,
                    (lr, min_lr),
                    max_iters,
                    (decay, warmup),
                    beta2,
                    device,
                    compilation,
                )| PartialRunConfig {
                    output_directory: out_dir,
                    eval_interval,
                    eval_iters,
                    log_interval,
                    gradient_accumulation_steps: accum,
                    batch_size: batch,
                    context_length: context,
                    layer_count: layers,
                    head_count: Some(heads),
                    embedding_width: Some(width),
                    dropout_rate: dropout,
                    learning_rate: Some(lr),
                    min_lr: Some(min_lr),
                    max_iters,
                    lr_decay_iters: Some(decay),
                    warmup_iters: Some(warmup),
                    beta2,
                    compute_device: device,
                    use_compilation: Some(compilation),
                    ..Default::default()
                },
            )
    }

    /// Unconstrained numeric inputs, including invalid ones
    fn arb_any_partial() -> impl Strategy<Value = PartialRunConfig> {
        (
            proptest::option::of(any::<usize>()),
            proptest::option::of(any::<usize>()),
            proptest::option::of(any::<usize>()),
            proptest::option::of(any::<f32>()),
            proptest::option::of(any::<f32>()),
            proptest::option::of(any::<f32>()),
            proptest::option::of(any::<f32>()),
            proptest::option::of(any::<usize>()),
            proptest::option::of(any::<usize>()),
        )
            .prop_map(
                |(batch, heads, width, dropout, lr, min_lr, beta2, decay, warmup)| {
                    PartialRunConfig {
                        batch_size: batch,
                        head_count: heads,
                        embedding_width: width,
                        dropout_rate: dropout,
                        learning_rate: lr,
                        min_lr,
                        beta2,
                        lr_decay_iters: decay,
                        warmup_iters: warmup,
                        ..Default::default()
                    }
                },
            )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn prop_resolution_is_deterministic(partial in arb_valid_partial()) {
            let first = resolve(&partial, &FixedProbe::present());
            let second = resolve(&partial, &FixedProbe::present());
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_valid_partial_resolves(partial in arb_valid_partial()) {
            let result = resolve(&partial, &FixedProbe::absent());
            prop_assert!(result.is_ok(), "rejected valid input: {:?}", result);
        }

        #[test]
        fn prop_explicit_values_survive_resolution(partial in arb_valid_partial()) {
            let config = resolve(&partial, &FixedProbe::absent()).unwrap();

            if let Some(batch) = partial.batch_size {
                prop_assert_eq!(config.batch_size(), batch);
            }
            if let Some(context) = partial.context_length {
                prop_assert_eq!(config.context_length(), context);
            }
            prop_assert_eq!(config.head_count(), partial.head_count.unwrap());
            prop_assert_eq!(config.embedding_width(), partial.embedding_width.unwrap());
            prop_assert_eq!(config.learning_rate(), partial.learning_rate.unwrap());
        }

        #[test]
        fn prop_resolve_never_panics(partial in arb_any_partial()) {
            // Ok or a typed error, regardless of input
            let _ = resolve(&partial, &FixedProbe::absent());
        }

        #[test]
        fn prop_divisibility_holds_in_resolved_record(partial in arb_valid_partial()) {
            let config = resolve(&partial, &FixedProbe::absent()).unwrap();
            prop_assert_eq!(config.embedding_width() % config.head_count(), 0);
            prop_assert_eq!(config.head_dim() * config.head_count(), config.embedding_width());
        }

        #[test]
        fn prop_accelerator_only_when_present_or_explicit(partial in arb_valid_partial()) {
            let config = resolve(&partial, &FixedProbe::absent()).unwrap();
            if config.compute_device() == ComputeDevice::Accelerator {
                prop_assert_eq!(
                    partial.compute_device,
                    Some(DevicePreference::Accelerator)
                );
            }
        }

        #[test]
        fn prop_effective_batch_is_product(partial in arb_valid_partial()) {
            let config = resolve(&partial, &FixedProbe::absent()).unwrap();
            prop_assert_eq!(
                config.effective_batch_size(),
                config.batch_size() * config.gradient_accumulation_steps()
            );
        }
    }
}
