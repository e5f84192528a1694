//! Identity role and policy specs

use crate::descriptor::{Describe, ResourceKind};
use crate::naming::NamingScheme;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyEffect {
    Allow,
    Deny,
}

/// One statement of a policy document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyStatement {
    pub sid: Option<String>,
    pub effect: PolicyEffect,
    pub actions: Vec<String>,
    pub resources: Vec<String>,
    /// Condition block, verbatim in the provider's condition grammar.
    pub conditions: Option<Value>,
}

impl PolicyStatement {
    pub fn allow<A, R>(actions: A, resources: R) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            sid: None,
            effect: PolicyEffect::Allow,
            actions: actions.into_iter().map(Into::into).collect(),
            resources: resources.into_iter().map(Into::into).collect(),
            conditions: None,
        }
    }

    pub fn with_sid(mut self, sid: impl Into<String>) -> Self {
        self.sid = Some(sid.into());
        self
    }

    pub fn with_conditions(mut self, conditions: Value) -> Self {
        self.conditions = Some(conditions);
        self
    }
}

/// Role spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleSpec {
    /// Full role name including the dated deployment suffix.
    pub name: String,

    /// Service principal allowed to assume the role.
    pub assumed_by: String,

    pub description: Option<String>,

    /// Provider-managed policies attached by name.
    pub managed_policies: Vec<String>,

    /// Inline policy documents, keyed by policy name.
    pub inline_policies: BTreeMap<String, Vec<PolicyStatement>>,
}

impl Describe for RoleSpec {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Role
    }

    fn resource_name(&self) -> &str {
        &self.name
    }
}

fn inline(name: &str, statements: Vec<PolicyStatement>) -> BTreeMap<String, Vec<PolicyStatement>> {
    let mut policies = BTreeMap::new();
    policies.insert(name.to_string(), statements);
    policies
}

/// Node-group role for the object-storage gateway nodes: full access to the
/// deployment's buckets (matched through the shared suffix pattern) plus
/// the standard worker-node managed policies.
pub fn object_gateway_node_role(naming: &NamingScheme) -> RoleSpec {
    let pattern = naming.bucket_pattern();
    RoleSpec {
        name: naming.role_name("object-gateway-node-group"),
        assumed_by: "ec2.amazonaws.com".to_string(),
        description: None,
        managed_policies: vec![
            "AmazonEKSWorkerNodePolicy".to_string(),
            "AmazonEC2ContainerRegistryReadOnly".to_string(),
            "AmazonEKS_CNI_Policy".to_string(),
        ],
        inline_policies: inline(
            "deployment_buckets_policy",
            vec![PolicyStatement::allow(
                ["s3:*"],
                [pattern.clone(), format!("{}/*", pattern)],
            )],
        ),
    }
}

/// Role the VPC flow-log service assumes to push logs to CloudWatch.
pub fn flow_log_role(naming: &NamingScheme) -> RoleSpec {
    RoleSpec {
        name: naming.role_name("vpc-flow-log-role"),
        assumed_by: "vpc-flow-logs.amazonaws.com".to_string(),
        description: None,
        managed_policies: vec![],
        inline_policies: inline(
            "vpc_logs_policy",
            vec![
                PolicyStatement::allow(
                    [
                        "logs:PutLogEvents",
                        "logs:DescribeLogStreams",
                        "logs:DescribeLogGroups",
                        "logs:CreateLogStream",
                    ],
                    ["*"],
                )
                .with_sid("VpcFlowLogsPushToCloudWatch"),
            ],
        ),
    }
}

/// IRSA role for the in-cluster load balancer controller.
pub fn load_balancer_controller_role(naming: &NamingScheme) -> RoleSpec {
    let statements = vec![
        PolicyStatement::allow(["iam:CreateServiceLinkedRole"], ["*"]).with_conditions(json!({
            "StringEquals": {
                "iam:AWSServiceName": "elasticloadbalancing.amazonaws.com"
            }
        })),
        PolicyStatement::allow(
            [
                "ec2:DescribeAccountAttributes",
                "ec2:DescribeAddresses",
                "ec2:DescribeAvailabilityZones",
                "ec2:DescribeInternetGateways",
                "ec2:DescribeVpcs",
                "ec2:DescribeVpcPeeringConnections",
                "ec2:DescribeSubnets",
                "ec2:DescribeSecurityGroups",
                "ec2:DescribeInstances",
                "ec2:DescribeNetworkInterfaces",
                "ec2:DescribeTags",
                "ec2:GetCoipPoolUsage",
                "ec2:DescribeCoipPools",
                "elasticloadbalancing:DescribeLoadBalancers",
                "elasticloadbalancing:DescribeLoadBalancerAttributes",
                "elasticloadbalancing:DescribeListeners",
                "elasticloadbalancing:DescribeListenerCertificates",
                "elasticloadbalancing:DescribeSSLPolicies",
                "elasticloadbalancing:DescribeRules",
                "elasticloadbalancing:DescribeTargetGroups",
                "elasticloadbalancing:DescribeTargetGroupAttributes",
                "elasticloadbalancing:DescribeTargetHealth",
                "elasticloadbalancing:DescribeTags",
            ],
            ["*"],
        ),
        PolicyStatement::allow(
            [
                "cognito-idp:DescribeUserPoolClient",
                "acm:ListCertificates",
                "acm:DescribeCertificate",
                "iam:ListServerCertificates",
                "iam:GetServerCertificate",
                "waf-regional:GetWebACL",
                "waf-regional:GetWebACLForResource",
                "waf-regional:AssociateWebACL",
                "waf-regional:DisassociateWebACL",
                "wafv2:GetWebACL",
                "wafv2:GetWebACLForResource",
                "wafv2:AssociateWebACL",
                "wafv2:DisassociateWebACL",
                "shield:GetSubscriptionState",
                "shield:DescribeProtection",
                "shield:CreateProtection",
                "shield:DeleteProtection",
            ],
            ["*"],
        ),
        PolicyStatement::allow(
            [
                "ec2:AuthorizeSecurityGroupIngress",
                "ec2:RevokeSecurityGroupIngress",
            ],
            ["*"],
        ),
        PolicyStatement::allow(["ec2:CreateSecurityGroup"], ["*"]),
        PolicyStatement::allow(["ec2:CreateTags"], ["arn:aws:ec2:*:*:security-group/*"])
            .with_conditions(json!({
                "StringEquals": {
                    "ec2:CreateAction": "CreateSecurityGroup"
                },
                "Null": {
                    "aws:RequestTag/elbv2.k8s.aws/cluster": "false"
                }
            })),
        PolicyStatement::allow(
            ["ec2:CreateTags", "ec2:DeleteTags"],
            ["arn:aws:ec2:*:*:security-group/*"],
        )
        .with_conditions(json!({
            "Null": {
                "aws:RequestTag/elbv2.k8s.aws/cluster": "true",
                "aws:ResourceTag/elbv2.k8s.aws/cluster": "false"
            }
        })),
        PolicyStatement::allow(
            [
                "ec2:AuthorizeSecurityGroupIngress",
                "ec2:RevokeSecurityGroupIngress",
                "ec2:DeleteSecurityGroup",
            ],
            ["*"],
        )
        .with_conditions(json!({
            "Null": {
                "aws:ResourceTag/elbv2.k8s.aws/cluster": "false"
            }
        })),
        PolicyStatement::allow(
            [
                "elasticloadbalancing:CreateLoadBalancer",
                "elasticloadbalancing:CreateTargetGroup",
            ],
            ["*"],
        )
        .with_conditions(json!({
            "Null": {
                "aws:RequestTag/elbv2.k8s.aws/cluster": "false"
            }
        })),
        PolicyStatement::allow(
            [
                "elasticloadbalancing:CreateListener",
                "elasticloadbalancing:DeleteListener",
                "elasticloadbalancing:CreateRule",
                "elasticloadbalancing:DeleteRule",
            ],
            ["*"],
        ),
        PolicyStatement::allow(
            [
                "elasticloadbalancing:AddTags",
                "elasticloadbalancing:RemoveTags",
            ],
            [
                "arn:aws:elasticloadbalancing:*:*:targetgroup/*/*",
                "arn:aws:elasticloadbalancing:*:*:loadbalancer/net/*/*",
                "arn:aws:elasticloadbalancing:*:*:loadbalancer/app/*/*",
            ],
        )
        .with_conditions(json!({
            "Null": {
                "aws:RequestTag/elbv2.k8s.aws/cluster": "true",
                "aws:ResourceTag/elbv2.k8s.aws/cluster": "false"
            }
        })),
        PolicyStatement::allow(
            [
                "elasticloadbalancing:AddTags",
                "elasticloadbalancing:RemoveTags",
            ],
            [
                "arn:aws:elasticloadbalancing:*:*:listener/net/*/*/*",
                "arn:aws:elasticloadbalancing:*:*:listener/app/*/*/*",
                "arn:aws:elasticloadbalancing:*:*:listener-rule/net/*/*/*",
                "arn:aws:elasticloadbalancing:*:*:listener-rule/app/*/*/*",
            ],
        ),
        PolicyStatement::allow(
            [
                "elasticloadbalancing:ModifyLoadBalancerAttributes",
                "elasticloadbalancing:SetIpAddressType",
                "elasticloadbalancing:SetSecurityGroups",
                "elasticloadbalancing:SetSubnets",
                "elasticloadbalancing:DeleteLoadBalancer",
                "elasticloadbalancing:ModifyTargetGroup",
                "elasticloadbalancing:ModifyTargetGroupAttributes",
                "elasticloadbalancing:DeleteTargetGroup",
            ],
            ["*"],
        )
        .with_conditions(json!({
            "Null": {
                "aws:ResourceTag/elbv2.k8s.aws/cluster": "false"
            }
        })),
        PolicyStatement::allow(
            [
                "elasticloadbalancing:RegisterTargets",
                "elasticloadbalancing:DeregisterTargets",
            ],
            ["arn:aws:elasticloadbalancing:*:*:targetgroup/*/*"],
        ),
        PolicyStatement::allow(
            [
                "elasticloadbalancing:SetWebAcl",
                "elasticloadbalancing:ModifyListener",
                "elasticloadbalancing:AddListenerCertificates",
                "elasticloadbalancing:RemoveListenerCertificates",
                "elasticloadbalancing:ModifyRule",
            ],
            ["*"],
        ),
    ];

    RoleSpec {
        name: naming.role_name("load-balancer-controller"),
        assumed_by: "elasticloadbalancing.amazonaws.com".to_string(),
        description: Some("IRSA role for the cluster load balancer controller".to_string()),
        managed_policies: vec![],
        inline_policies: inline("load_balancer_policy", statements),
    }
}

/// IRSA role for the external-dns controller.
pub fn external_dns_role(naming: &NamingScheme) -> RoleSpec {
    RoleSpec {
        name: naming.role_name("external-dns"),
        assumed_by: "route53.amazonaws.com".to_string(),
        description: Some("IRSA role for the cluster external dns controller".to_string()),
        managed_policies: vec![],
        inline_policies: inline(
            "external_dns_policy",
            vec![
                PolicyStatement::allow(
                    ["route53:ChangeResourceRecordSets"],
                    ["arn:aws:route53:::hostedzone/*"],
                ),
                PolicyStatement::allow(
                    ["route53:ListHostedZones", "route53:ListResourceRecordSets"],
                    ["*"],
                ),
            ],
        ),
    }
}

/// IRSA role for the cluster autoscaler.
pub fn cluster_autoscaler_role(naming: &NamingScheme) -> RoleSpec {
    RoleSpec {
        name: naming.role_name("cluster-autoscaler"),
        assumed_by: "autoscaling.amazonaws.com".to_string(),
        description: Some("IRSA role for the cluster autoscaler".to_string()),
        managed_policies: vec![],
        inline_policies: inline(
            "cluster_autoscaler_policy",
            vec![PolicyStatement::allow(
                [
                    "autoscaling:DescribeAutoScalingGroups",
                    "autoscaling:DescribeAutoScalingInstances",
                    "autoscaling:DescribeLaunchConfigurations",
                    "autoscaling:SetDesiredCapacity",
                    "autoscaling:DescribeTags",
                    "autoscaling:TerminateInstanceInAutoScalingGroup",
                    "ec2:DescribeInstanceTypes",
                ],
                ["*"],
            )],
        ),
    }
}

/// IRSA role for the EBS CSI driver.
pub fn ebs_csi_driver_role(naming: &NamingScheme) -> RoleSpec {
    RoleSpec {
        name: naming.role_name("ebs-csi-driver"),
        assumed_by: "ec2.amazonaws.com".to_string(),
        description: Some("IRSA role for the EBS CSI driver".to_string()),
        managed_policies: vec!["AmazonEBSCSIDriverPolicy".to_string()],
        inline_policies: BTreeMap::new(),
    }
}

/// All six platform roles, in declaration order.
pub fn platform_roles(naming: &NamingScheme) -> Vec<RoleSpec> {
    vec![
        object_gateway_node_role(naming),
        flow_log_role(naming),
        load_balancer_controller_role(naming),
        external_dns_role(naming),
        cluster_autoscaler_role(naming),
        ebs_csi_driver_role(naming),
    ]
}
